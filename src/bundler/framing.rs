//! Header and footer blocks that mark where each bundled file starts and ends.

use crate::bundler::options::Stamp;

pub const SHEBANG: &str = "#!/bin/bash";
pub const RULE_WIDTH: usize = 80;
/// 4-digit year, 2-digit month and day, then unpadded 12-hour time
pub const DATE_FORMAT: &str = "%Y-%m-%d %-I:%-M:%-S";

fn rule() -> String {
    let mut line = "#".repeat(RULE_WIDTH);
    line.push('\n');
    line
}

pub fn header(path: &str, keep_shebang: bool, stamp: &Stamp) -> String {
    let mut s = String::new();
    if keep_shebang {
        s.push_str(SHEBANG);
    }
    s.push_str("\n\n");

    let rule = rule();
    s.push_str(&rule);
    s.push_str(&format!("#  File:  {path}\n"));
    s.push_str(&format!(
        "#  Bundle Date: {}\n",
        stamp.resolve().format(DATE_FORMAT)
    ));
    s.push_str(&rule);
    s.push('\n');
    s
}

pub fn footer(path: &str) -> String {
    let rule = rule();
    let mut s = String::from("\n\n");
    s.push_str(&rule);
    s.push_str(&format!("#  End File:  {path}\n"));
    s.push_str(&rule);
    s.push_str("\n\n");
    s
}
