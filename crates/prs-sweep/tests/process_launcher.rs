#![cfg(unix)]

use prs_core::{LaunchRequest, Launcher, SweepError};
use prs_sweep::ProcessLauncher;

fn shell(script: &str) -> LaunchRequest {
    LaunchRequest::new("sh", vec!["-c".to_string(), script.to_string()])
}

#[test]
fn exit_codes_are_reported() {
    let mut launcher = ProcessLauncher;
    assert!(launcher.launch(&shell("exit 0")).unwrap().success());
    let outcome = launcher.launch(&shell("exit 3")).unwrap();
    assert_eq!(outcome.code, Some(3));
    assert!(!outcome.success());
}

#[test]
fn env_overrides_reach_only_the_child() {
    let mut launcher = ProcessLauncher;
    let request = shell("test \"$PRS_TEST_THREADS\" = 7").with_env("PRS_TEST_THREADS", "7");
    assert!(launcher.launch(&request).unwrap().success());
    assert!(std::env::var_os("PRS_TEST_THREADS").is_none());
}

#[test]
fn missing_program_is_a_spawn_error() {
    let mut launcher = ProcessLauncher;
    let request = LaunchRequest::new("/nonexistent/prs-sampling-binary", vec![]);
    let err = launcher.launch(&request).unwrap_err();
    assert!(matches!(err, SweepError::Trial(_)));
    assert_eq!(err.info().code, "spawn");
}
