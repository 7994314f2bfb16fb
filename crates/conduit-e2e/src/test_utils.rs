//! Test utilities for the conduit-e2e crate.
use std::io::Write;

use tempfile::NamedTempFile;

/// Creates a temporary config file pointing at `base_url`.
///
/// The file is removed when the returned handle is dropped.
pub fn create_temp_config_file(base_url: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("conduit-e2e-test")
        .suffix(".yml")
        .rand_bytes(8)
        .tempfile()
        .unwrap();
    write!(
        file,
        r#"
base_url: "{base_url}"
prefix: test-
timeouts:
  request_secs: 2
  scenario_secs: 10
"#
    )
    .unwrap();
    file.flush().unwrap();
    file
}
