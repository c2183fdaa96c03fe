// src/backup/artifact.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Name used when the source path has no final component (e.g. `/`).
pub const FALLBACK_BASENAME: &str = "backup";

/// `YYYY-MM-DD.HHMM` in local time.
///
/// Minute precision: two runs of the same source within the same minute
/// produce the same artifact name.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y-%m-%d.%H%M").to_string()
}

/// `<target>/<basename(source)>.<timestamp>`, without any strategy-specific
/// extension.
pub fn artifact_base(target: &Path, source: &Path, stamp: &str) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_BASENAME.to_string());
    target.join(format!("{name}.{stamp}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_is_zero_padded_to_the_minute() {
        let at = Local.with_ymd_and_hms(2012, 3, 6, 3, 7, 59).unwrap();
        assert_eq!(timestamp(&at), "2012-03-06.0307");
    }

    #[test]
    fn base_uses_source_basename() {
        assert_eq!(
            artifact_base(
                Path::new("/mnt/dumps/redmine"),
                Path::new("/home/marco/sites/redmine/"),
                "2012-03-16.0300"
            ),
            PathBuf::from("/mnt/dumps/redmine/redmine.2012-03-16.0300")
        );
    }

    #[test]
    fn root_source_falls_back_to_generic_name() {
        assert_eq!(
            artifact_base(Path::new("/b"), Path::new("/"), "t"),
            PathBuf::from("/b/backup.t")
        );
    }
}
