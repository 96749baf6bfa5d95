//! Whole-bundle minification

use crate::bundler::errors::BundleError;
use crate::bundler::framing::SHEBANG;
use crate::parser::{parse_script, ParseOptions};
use crate::printer::Printer;

/// Reparse a bundle without comments and print it minified under a single
/// `#!/bin/bash` line. Running it on its own output changes nothing.
pub fn minify(content: &str) -> Result<String, BundleError> {
    let script = parse_script(content, ParseOptions { keep_comments: false }).map_err(|source| {
        BundleError::Parse {
            origin: "bundle".to_string(),
            source,
        }
    })?;

    let mut out = String::from(SHEBANG);
    out.push('\n');
    out.push_str(&Printer::minified().print_script(&script));
    Ok(out)
}
