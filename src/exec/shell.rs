// src/exec/shell.rs

//! Quoting helpers for building `sh -c` command lines.

use std::path::Path;

/// Escape a value for use inside single quotes.
/// Replaces `'` with `'\''` (end quote, escaped quote, start quote).
pub fn escape_single_quote_content(value: &str) -> String {
    value.replace('\'', "'\\''")
}

/// Quote a path for shell execution (always quotes).
pub fn quote_path(path: &Path) -> String {
    quote_str(&path.to_string_lossy())
}

/// Quote an arbitrary string for shell execution (always quotes).
pub fn quote_str(value: &str) -> String {
    format!("'{}'", escape_single_quote_content(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_path_with_spaces() {
        assert_eq!(
            quote_path(Path::new("/mnt/My Backups/db")),
            "'/mnt/My Backups/db'"
        );
    }

    #[test]
    fn quote_path_with_single_quote() {
        assert_eq!(quote_path(Path::new("/srv/it's")), "'/srv/it'\\''s'");
    }

    #[test]
    fn quote_str_neutralises_expansion() {
        assert_eq!(quote_str("$HOME `id`"), "'$HOME `id`'");
    }

    #[test]
    fn quote_str_empty() {
        assert_eq!(quote_str(""), "''");
    }
}
