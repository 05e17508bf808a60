//! Integration tests for the build observer.

#![cfg(unix)]

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

use dockhand::build::{BuildObserver, BuildOutcome};
use dockhand::classify::{Classifier, RuleSet};
use dockhand::Error;

fn spawn_sh(script: &str) -> Child {
    Command::new("sh")
        .args(["-c", script])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn sh_command() -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), "...".to_string()]
}

#[tokio::test]
async fn second_attempt_sees_only_its_own_output() {
    let mut observer = BuildObserver::new();

    observer
        .started(sh_command(), PathBuf::from("/tmp"), spawn_sh("printf 'a\\nb\\n'"))
        .unwrap();
    observer.wait_until_completes().await.unwrap();
    assert!(observer.passed());
    assert!(observer.output().contains('a'));
    assert!(observer.output().contains('b'));
    observer.completed();

    observer
        .started(sh_command(), PathBuf::from("/tmp"), spawn_sh("echo c"))
        .unwrap();
    observer.wait_until_completes().await.unwrap();
    assert_eq!(observer.output().trim(), "c");
    assert!(!observer.output().contains('a'));
    assert!(!observer.output().contains('b'));
    observer.completed();
}

#[tokio::test]
async fn failure_carries_the_complete_result() {
    let mut observer = BuildObserver::new();

    observer
        .started(
            sh_command(),
            PathBuf::from("/work"),
            spawn_sh("echo progress; echo 'went wrong' >&2; exit 9"),
        )
        .unwrap();
    observer.wait_until_completes().await.unwrap();

    assert!(!observer.passed());
    match observer.outcome().unwrap() {
        BuildOutcome::Failed(result) => {
            assert_eq!(result.exit_code(), 9);
            assert_eq!(result.stdout().trim(), "progress");
            assert_eq!(result.stderr().trim(), "went wrong");
            assert_eq!(result.working_dir(), &PathBuf::from("/work"));
        }
        BuildOutcome::Passed => panic!("expected a failed outcome"),
    }
    observer.completed();
}

#[tokio::test]
async fn missing_buildx_diagnoses_as_unsupported() {
    let classifier = Classifier::new();
    let rules = RuleSet::build();
    let mut observer = BuildObserver::new();

    observer
        .started(
            sh_command(),
            PathBuf::from("/work"),
            spawn_sh(
                "echo 'ERROR: BuildKit is enabled but the buildx component is missing or broken.' >&2; exit 1",
            ),
        )
        .unwrap();
    observer.wait_until_completes().await.unwrap();

    let err = observer.diagnose(&classifier, &rules).unwrap();
    match err {
        Error::Unsupported { remediation, .. } => {
            assert!(remediation.contains("docker-buildx"));
        }
        other => panic!("expected Unsupported, got {other}"),
    }
    observer.completed();
}

#[tokio::test]
async fn noise_is_skipped_when_diagnosing() {
    let classifier = Classifier::new();
    let rules = RuleSet::build();
    let mut observer = BuildObserver::new();

    // A benign warning precedes the real diagnostic on stderr.
    let script = "echo 'WARNING: Error loading config file: /root/.docker/config.json' >&2; \
                  echo 'Error response from daemon: squash is only supported with experimental mode' >&2; \
                  exit 1";
    observer
        .started(sh_command(), PathBuf::from("/work"), spawn_sh(script))
        .unwrap();
    observer.wait_until_completes().await.unwrap();

    let err = observer.diagnose(&classifier, &rules).unwrap();
    assert!(matches!(err, Error::Unsupported { .. }));
    observer.completed();
}

#[tokio::test]
async fn large_build_output_is_fully_drained() {
    let mut observer = BuildObserver::new();

    let script = "i=0; while [ $i -lt 1500 ]; do \
                  echo \"step output line $i with padding 0123456789\"; \
                  echo \"progress $i also padded 0123456789\" >&2; \
                  i=$((i+1)); done";
    observer
        .started(sh_command(), PathBuf::from("/tmp"), spawn_sh(script))
        .unwrap();
    observer.wait_until_completes().await.unwrap();

    assert!(observer.passed());
    assert_eq!(observer.output().lines().count(), 1500);
    assert_eq!(observer.errors().lines().count(), 1500);
    observer.completed();
}
