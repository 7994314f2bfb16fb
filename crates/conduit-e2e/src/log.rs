//! Logging for conduit-e2e.
use anyhow::Context;
use conduit_e2e_core::get_data_dir;
use std::io::LineWriter;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::OffsetTime;

const MAX_LOG_BYTES: u64 = 100 * 1024;

/// Initializes file based logging.
///
/// Logs go to `<data_dir>/conduit-e2e.log`. A log larger than 100KB is moved
/// to `conduit-e2e.log.old` first, replacing an older backup. Both crates of the
/// workspace log at DEBUG, which includes every request and response status.
pub fn setup_logging() -> anyhow::Result<()> {
    let data_dir = get_data_dir().context("Failed to get data directory")?;
    let log_path = data_dir.join("conduit-e2e.log");

    if log_path.exists() {
        let metadata = std::fs::metadata(&log_path)?;
        if metadata.len() > MAX_LOG_BYTES {
            let backup_path = data_dir.join("conduit-e2e.log.old");
            if backup_path.exists() {
                std::fs::remove_file(&backup_path)?;
            }
            std::fs::rename(&log_path, backup_path)?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // Flush after every line
    let writer = Mutex::new(LineWriter::new(log_file));

    tracing_subscriber::fmt()
        .with_env_filter("conduit_e2e=debug,conduit_e2e_core=debug")
        .with_writer(writer)
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .init();
    Ok(())
}
