//! Writing the finished bundle

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::bundler::errors::BundleError;

/// Owner read/write only
pub const OUTPUT_MODE: u32 = 0o600;

/// Create or truncate `path` and write `content` to it. New files get
/// [`OUTPUT_MODE`] on unix.
pub fn write_to_file(path: impl AsRef<Path>, content: &str) -> Result<(), BundleError> {
    let path = path.as_ref();
    let wrap = |source| BundleError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(OUTPUT_MODE);
    }

    let mut file = options.open(path).map_err(wrap)?;
    file.write_all(content.as_bytes()).map_err(wrap)?;
    file.flush().map_err(wrap)?;
    Ok(())
}
