//! File logging runs in its own test binary so the global level is not shared.

use logger::{info, set_level, verbose, warn, Level};

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_captures_tagged_messages_only() {
    use logger::{close_file_logging, enable_verbose, init_file_logging};
    use std::fs;

    let dir = tempfile::TempDir::new().expect("temp dir");
    let log_path = dir.path().join("docpress.log");

    set_level(Level::Info);
    assert!(init_file_logging(&log_path));
    info!("rendering diagram {}", "architecture");
    warn!("could not remove {}", "git_diagram.png");
    enable_verbose();
    verbose!("progress line stays on stdout");
    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("[INFO] rendering diagram architecture"));
    assert!(contents.contains("[WARN] could not remove git_diagram.png"));
    assert!(!contents.contains("progress line"));
}
