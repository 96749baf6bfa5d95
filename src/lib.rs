//! bash-bundler - bundle a bash script and everything it sources into one file
//!
//! Each sourced script is parsed, re-printed and inlined in place of its
//! `source` line, framed by a comment header and footer. The result can
//! optionally be minified.

pub mod ast;
pub mod bundler;
pub mod parser;
pub mod printer;

pub use ast::types::*;
pub use bundler::{
    bundle, minify, write_to_file, BundleError, BundleLog, BundleOptions, Bundler, LogSink,
    NullLog, Stamp,
};
pub use parser::{parse, parse_script, ParseException, ParseOptions, Parser};
pub use printer::Printer;
