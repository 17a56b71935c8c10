use mindtree_core::{default_log_level, init_logging, logging_status};
use tempfile::tempdir;

// Logging state is process-global, so every scenario shares one test.
#[test]
fn init_is_idempotent_and_rejects_reconfiguration() {
    let dir = tempdir().unwrap();
    let dir_str = dir.path().to_str().unwrap().to_string();
    let other = tempdir().unwrap();
    let other_str = other.path().to_str().unwrap().to_string();

    assert!(!default_log_level().is_empty());
    assert!(logging_status().is_none());

    init_logging("info", &dir_str).unwrap();
    init_logging("info", &dir_str).unwrap();

    let level_conflict = init_logging("debug", &dir_str).unwrap_err();
    assert!(level_conflict.contains("already initialized"));
    let dir_conflict = init_logging("info", &other_str).unwrap_err();
    assert!(dir_conflict.contains("already initialized"));

    let (level, active_dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(active_dir, dir.path());
}
