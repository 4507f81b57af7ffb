use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

/// Self-documenting header written at the top of a new journal.
const FILE_HEADER: &str = "\
<!-- daybook write journal — append-only failed-write data
     Payloads that could not be saved normally land here.
     Safe to delete if empty or stale. -->

---
";

/// Return the path to the write journal file.
pub fn journal_path(dir: &Path) -> PathBuf {
    dir.join(".journal.log")
}

/// Append a failed collection write to the journal. Best effort: if the
/// journal itself cannot be written there is nowhere left to report, so
/// the error is swallowed.
pub fn log_failed_write(dir: &Path, key: &str, error: &std::io::Error, payload: &str) {
    let path = journal_path(dir);
    let is_new = !path.exists();

    let mut entry = String::new();
    if is_new {
        entry.push_str(FILE_HEADER);
    }
    entry.push_str(&format!(
        "## {} — write failed: {key}\nError: {error}\n\n```json\n{payload}\n```\n\n---\n",
        Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    ));

    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(entry.as_bytes()));
}
