//! Bundling options

use chrono::{Local, NaiveDateTime};

/// Where the `Bundle Date` in each header comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stamp {
    /// Wall-clock time, read once per framed file
    #[default]
    Now,
    /// A fixed time, for reproducible output
    Fixed(NaiveDateTime),
}

impl Stamp {
    pub fn resolve(&self) -> NaiveDateTime {
        match self {
            Stamp::Now => Local::now().naive_local(),
            Stamp::Fixed(at) => *at,
        }
    }
}

/// Options for a bundling run.
#[derive(Debug, Clone)]
pub struct BundleOptions {
    /// Emit `#!/bin/bash` at the top of the entry file's header
    pub keep_shebang: bool,
    /// Spaces per nesting level when printing statements
    pub indent: usize,
    /// Keep the original blanks between tokens
    pub keep_padding: bool,
    pub stamp: Stamp,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            keep_shebang: true,
            indent: 4,
            keep_padding: true,
            stamp: Stamp::Now,
        }
    }
}
