//! Error types for bundling

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::parser::ParseException;

/// Everything that can abort a bundle. Each variant names the operation that
/// failed; no partial output is ever returned alongside one.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("error opening file {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("error while parsing statements in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: ParseException,
    },

    #[error("error writing to file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("circular source of {path}: {}", format_chain(.chain))]
    Cycle { path: String, chain: Vec<PathBuf> },
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_chain() {
        let err = BundleError::Cycle {
            path: "./a.sh".to_string(),
            chain: vec![PathBuf::from("/x/a.sh"), PathBuf::from("/x/b.sh"), PathBuf::from("/x/a.sh")],
        };
        assert_eq!(
            err.to_string(),
            "circular source of ./a.sh: /x/a.sh -> /x/b.sh -> /x/a.sh"
        );
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = BundleError::Parse {
            origin: "lib.sh".to_string(),
            source: ParseException::new("unexpected `fi`", 3, 1),
        };
        assert_eq!(
            err.to_string(),
            "error while parsing statements in lib.sh: line 3: unexpected `fi`"
        );
    }
}
