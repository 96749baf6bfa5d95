//! Bundler: inline every sourced script into its parent.
//!
//! A file is parsed, printed statement by statement, and scanned line by
//! line. Lines that carry a `source`/`.` directive are replaced by the framed
//! bundle of the referenced file; everything else is copied through, except
//! shebang lines. The finished text is wrapped in a header and footer.

pub mod directive;
pub mod errors;
pub mod framing;
pub mod logging;
pub mod minify;
pub mod options;
pub mod output;
pub mod text;

use std::fs;
use std::path::PathBuf;

use indexmap::IndexSet;

use crate::parser::{parse_script, ParseOptions};
use crate::printer::Printer;

pub use directive::{containing_directory, Directive};
pub use errors::BundleError;
pub use logging::{BundleLog, LogSink, NullLog};
pub use minify::minify;
pub use options::{BundleOptions, Stamp};
pub use output::write_to_file;

use text::is_shebang;

pub struct Bundler<'a> {
    options: BundleOptions,
    log: &'a dyn BundleLog,
    /// Canonical paths of the files currently being bundled, outermost first
    active: IndexSet<PathBuf>,
}

impl<'a> Bundler<'a> {
    pub fn new(options: BundleOptions, log: &'a dyn BundleLog) -> Self {
        Self {
            options,
            log,
            active: IndexSet::new(),
        }
    }

    /// Bundle an entry script using the configured shebang setting.
    pub fn run(&mut self, entry: &str) -> Result<String, BundleError> {
        let keep_shebang = self.options.keep_shebang;
        self.bundle(entry, keep_shebang)
    }

    /// Bundle `path` and, recursively, every file it sources. Nested files
    /// are always bundled without a shebang.
    pub fn bundle(&mut self, path: &str, keep_shebang: bool) -> Result<String, BundleError> {
        let canonical = fs::canonicalize(path).map_err(|source| BundleError::Open {
            path: path.to_string(),
            source,
        })?;
        if self.active.contains(&canonical) {
            let mut chain: Vec<PathBuf> = self.active.iter().cloned().collect();
            chain.push(canonical);
            return Err(BundleError::Cycle {
                path: path.to_string(),
                chain,
            });
        }

        self.active.insert(canonical);
        let result = self.bundle_file(path, keep_shebang);
        self.active.pop();
        result
    }

    fn bundle_file(&mut self, path: &str, keep_shebang: bool) -> Result<String, BundleError> {
        let content = fs::read_to_string(path).map_err(|source| BundleError::Open {
            path: path.to_string(),
            source,
        })?;
        let script = parse_script(&content, ParseOptions { keep_comments: true }).map_err(
            |source| BundleError::Parse {
                origin: path.to_string(),
                source,
            },
        )?;

        let directory = containing_directory(path);
        let printer = Printer::new()
            .indent(self.options.indent)
            .keep_padding(self.options.keep_padding);

        let mut buffer = framing::header(path, keep_shebang, &self.options.stamp);
        for statement in &script.statements {
            let printed = printer.print_statement(statement);
            for line in printed.split('\n') {
                if let Some(directive) = Directive::detect(line) {
                    let child_path = directive.resolve(&directory);
                    self.log
                        .info("Bundling source", &[("source_file", child_path.as_str())]);

                    let child = match self.bundle(&child_path, false) {
                        Ok(child) => child,
                        Err(err) => {
                            self.log.error(
                                "error while bundling source",
                                &[
                                    ("source_file", child_path.as_str()),
                                    ("error", err.to_string().as_str()),
                                ],
                            );
                            return Err(err);
                        }
                    };
                    buffer.push_str(&directive.splice(&child));
                } else if !is_shebang(line) {
                    buffer.push_str(line);
                    buffer.push('\n');
                }
            }
        }
        buffer.push_str(&framing::footer(path));
        Ok(buffer)
    }
}

/// Bundle `path` with default options, logging through the `log` facade.
pub fn bundle(path: &str, keep_shebang: bool) -> Result<String, BundleError> {
    let options = BundleOptions {
        keep_shebang,
        ..BundleOptions::default()
    };
    Bundler::new(options, &LogSink).run(path)
}
