//! Logging capability handed to the bundler.
//!
//! The bundler never reaches for a global logger. Callers pass a [`BundleLog`]
//! in: [`LogSink`] forwards to the `log` facade, [`NullLog`] drops everything,
//! and any `Fn(Level, &str, &[(&str, &str)])` closure works too.

use log::Level;

pub trait BundleLog {
    fn log(&self, level: Level, message: &str, fields: &[(&str, &str)]);

    fn info(&self, message: &str, fields: &[(&str, &str)]) {
        self.log(Level::Info, message, fields);
    }

    fn error(&self, message: &str, fields: &[(&str, &str)]) {
        self.log(Level::Error, message, fields);
    }
}

impl<F> BundleLog for F
where
    F: Fn(Level, &str, &[(&str, &str)]),
{
    fn log(&self, level: Level, message: &str, fields: &[(&str, &str)]) {
        self(level, message, fields);
    }
}

/// Forwards events to the `log` crate under the `bundler` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl BundleLog for LogSink {
    fn log(&self, level: Level, message: &str, fields: &[(&str, &str)]) {
        if fields.is_empty() {
            log::log!(target: "bundler", level, "{message}");
        } else {
            log::log!(target: "bundler", level, "{message} {}", format_fields(fields));
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl BundleLog for NullLog {
    fn log(&self, _level: Level, _message: &str, _fields: &[(&str, &str)]) {}
}

/// `key=value` pairs; values with blanks are quoted.
pub fn format_fields(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            if value.is_empty() || value.contains(char::is_whitespace) {
                format!("{key}={value:?}")
            } else {
                format!("{key}={value}")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_format_fields() {
        assert_eq!(
            format_fields(&[("source_file", "./lib.sh"), ("error", "no such file")]),
            "source_file=./lib.sh error=\"no such file\""
        );
    }

    #[test]
    fn test_closure_is_a_logger() {
        let seen = RefCell::new(Vec::new());
        let logger = |level: Level, message: &str, fields: &[(&str, &str)]| {
            seen.borrow_mut()
                .push(format!("{level} {message} {}", format_fields(fields)));
        };
        logger.info("Bundling source", &[("source_file", "a.sh")]);
        logger.error("failed", &[]);
        assert_eq!(
            *seen.borrow(),
            vec!["INFO Bundling source source_file=a.sh", "ERROR failed "]
        );
    }
}
