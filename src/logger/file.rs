/// File sink for log persistence
///
/// Appends every formatted line to a per-day log file under the app log
/// directory. Failures to write are swallowed after a single stderr
/// notice so logging can never take the application down.
use crate::paths::get_logs_dir;
use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

static LOG_FILE: Lazy<Mutex<Option<File>>> = Lazy::new(|| Mutex::new(None));

/// Open the log file for this run
///
/// Called once from logger::init(), after paths::ensure_all_directories().
pub fn init_file_logging() {
    let filename = format!("trackchat-{}.log", Local::now().format("%Y-%m-%d"));
    let path = get_logs_dir().join(filename);

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            if let Ok(mut slot) = LOG_FILE.lock() {
                *slot = Some(file);
            }
        }
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", path.display(), e);
        }
    }
}

/// Append one line to the log file (no-op when the file is unavailable)
pub fn write_to_file(line: &str) {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            let _ = writeln!(file, "{}", line);
        }
    }
}

/// Flush pending writes to disk
pub fn flush_file_logging() {
    if let Ok(mut slot) = LOG_FILE.lock() {
        if let Some(file) = slot.as_mut() {
            let _ = file.flush();
        }
    }
}
