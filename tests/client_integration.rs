//! End-to-end client tests against a scripted fake engine.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::time::Duration;

use tempfile::TempDir;

use dockhand::client::ContainerTarget;
use dockhand::config::ClientConfig;
use dockhand::resource::{ConfigName, ContainerId, ImageRef, NodeId, NodeRole};
use dockhand::{Deadline, Docker, Error};

/// Install a shell script as the engine binary. `__DIR__` inside the body
/// expands to the scratch directory, handy for call counters and flags.
fn fake_engine(script_body: &str) -> (TempDir, Docker) {
    let dir = TempDir::new().unwrap();
    let body = script_body.replace("__DIR__", &dir.path().display().to_string());
    let path = dir.path().join("docker");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();

    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    let config = ClientConfig {
        binary: path.display().to_string(),
        retry_interval_ms: 30,
        poll_interval_ms: 30,
        ..ClientConfig::default()
    };
    (dir, Docker::with_config(config).unwrap())
}

fn deadline() -> Deadline {
    Deadline::within(Duration::from_secs(10))
}

#[tokio::test]
async fn list_containers_decodes_records() {
    let (_dir, docker) = fake_engine(
        r#"echo '{"ID":"a1b2","Names":"web","Image":"nginx:1.27","State":"running","Status":"Up 2 hours"}'"#,
    );

    let containers = docker.list_containers(true, deadline()).await.unwrap();
    assert_eq!(containers.len(), 1);
    assert_eq!(containers[0].names, "web");
    assert!(containers[0].is_running());
}

#[tokio::test]
async fn create_container_returns_typed_id() {
    let (_dir, docker) = fake_engine("echo deadbeefcafe");

    let opts = dockhand::client::CreateContainerOpts::new(ImageRef::new("nginx").unwrap());
    let id = docker.create_container(&opts, deadline()).await.unwrap();
    assert_eq!(id.as_str(), "deadbeefcafe");
}

#[tokio::test]
async fn not_found_is_typed_and_not_retried() {
    let (dir, docker) = fake_engine(
        "echo x >> __DIR__/calls\n\
         echo 'Error response from daemon: No such container: abc123' >&2\n\
         exit 1",
    );

    let id = ContainerId::new("abc123").unwrap();
    let err = docker.inspect_container(&id, deadline()).await.unwrap_err();
    match err {
        Error::NotFound { id, .. } => assert_eq!(id, "abc123"),
        other => panic!("expected NotFound, got {other}"),
    }

    let calls = std::fs::read_to_string(dir.path().join("calls")).unwrap();
    assert_eq!(calls.lines().count(), 1);
}

#[tokio::test]
async fn daemon_unreachable_retries_until_deadline() {
    let (dir, docker) = fake_engine(
        "echo x >> __DIR__/calls\n\
         echo 'Cannot connect to the Docker daemon at unix:///var/run/docker.sock. Is the docker daemon running?' >&2\n\
         exit 1",
    );

    let result = docker
        .list_containers(true, Deadline::within(Duration::from_millis(150)))
        .await;

    match result {
        Err(Error::Timeout { last_error, .. }) => {
            assert!(last_error.unwrap().contains("daemon"));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }

    let calls = std::fs::read_to_string(dir.path().join("calls")).unwrap();
    assert!(calls.lines().count() >= 2, "at least one retry expected");
}

#[tokio::test]
async fn unknown_error_echoes_the_full_result() {
    let (_dir, docker) = fake_engine(
        "echo 'partial progress'\n\
         echo 'some unrecognized daemon error' >&2\n\
         exit 1",
    );

    let id = ContainerId::new("abc123").unwrap();
    let err = docker.stop_container(&id, deadline()).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("container stop abc123"));
    assert!(message.contains("partial progress"));
    assert!(message.contains("some unrecognized daemon error"));
    assert!(message.contains("exit code: 1"));
}

#[tokio::test]
async fn config_create_sends_payload_over_stdin() {
    let (dir, docker) = fake_engine("cat > __DIR__/received\necho cfgid123");

    let name = ConfigName::new("app.toml").unwrap();
    let created = docker
        .create_config(&name, b"listen = 8080", deadline())
        .await
        .unwrap();

    assert_eq!(created.as_str(), "cfgid123");
    let received = std::fs::read_to_string(dir.path().join("received")).unwrap();
    assert_eq!(received, "listen = 8080");
}

#[tokio::test]
async fn snapshot_gathers_every_kind_concurrently() {
    let (_dir, docker) = fake_engine(
        r#"case "$1 $2" in
  "container ls") echo '{"ID":"a1","Names":"web","Image":"nginx","State":"running","Status":"Up"}' ;;
  "image ls") echo '{"ID":"b2","Repository":"nginx","Tag":"1.27","Size":"188MB"}' ;;
  "network ls") echo '{"ID":"c3","Name":"bridge","Driver":"bridge","Scope":"local"}' ;;
  "context ls") echo '{"Name":"default","Current":true,"DockerEndpoint":"unix:///var/run/docker.sock","Description":""}' ;;
esac"#,
    );

    let snapshot = docker.snapshot(deadline()).await.unwrap();
    assert_eq!(snapshot.containers.len(), 1);
    assert_eq!(snapshot.images.len(), 1);
    assert_eq!(snapshot.networks.len(), 1);
    assert_eq!(snapshot.contexts.len(), 1);
    assert!(snapshot.contexts[0].current);
}

#[tokio::test]
async fn snapshot_propagates_the_first_failure() {
    let (_dir, docker) = fake_engine(
        r#"case "$1 $2" in
  "container ls") echo '{"ID":"a1","Names":"web","Image":"nginx","State":"running","Status":"Up"}' ;;
  "image ls") echo 'some unrecognized daemon error' >&2; exit 1 ;;
  "network ls") echo '{"ID":"c3","Name":"bridge","Driver":"bridge","Scope":"local"}' ;;
  "context ls") echo '{"Name":"default","Current":false,"DockerEndpoint":"unix://x","Description":""}' ;;
esac"#,
    );

    let err = docker.snapshot(deadline()).await.unwrap_err();
    assert!(err.to_string().contains("some unrecognized daemon error"));
}

#[tokio::test]
async fn wait_for_container_state_reverifies_through_the_feed() {
    let (_dir, docker) = fake_engine(
        r#"case "$1 $2" in
  "container inspect")
    if [ -f __DIR__/flag ]; then
      echo '[{"Id":"abc123","Name":"/web","Created":"2026-08-01T10:00:00Z","State":{"Status":"running","Running":true,"ExitCode":0},"Image":"sha256:ff","Config":{"Image":"nginx"}}]'
    else
      touch __DIR__/flag
      echo '[{"Id":"abc123","Name":"/web","Created":"2026-08-01T10:00:00Z","State":{"Status":"created","Running":false,"ExitCode":0},"Image":"sha256:ff","Config":{"Image":"nginx"}}]'
    fi
    ;;
  "events --filter")
    sleep 0.1
    echo '{"Type":"container","Action":"start","Actor":{"ID":"abc123"},"time":1}'
    sleep 30
    ;;
esac"#,
    );

    let id = ContainerId::new("abc123").unwrap();
    let detail = docker
        .wait_for_container_state(&id, ContainerTarget::Running, deadline())
        .await
        .unwrap();

    assert!(detail.state.running);
    assert_eq!(detail.plain_name(), "web");
}

#[tokio::test]
async fn node_role_converges_by_polling() {
    let (dir, docker) = fake_engine(
        r#"case "$1 $2" in
  "node inspect")
    echo x >> __DIR__/ncalls
    n=$(wc -l < __DIR__/ncalls)
    if [ "$n" -ge 3 ]; then role=manager; else role=worker; fi
    echo '[{"ID":"n1","Spec":{"Role":"'$role'","Availability":"active"},"Status":{"State":"ready","Addr":"10.0.0.1"}}]'
    ;;
esac"#,
    );

    let id = NodeId::new("n1").unwrap();
    let node = docker
        .wait_for_node_role(&id, NodeRole::Manager, deadline())
        .await
        .unwrap();

    assert_eq!(node.role(), Some(NodeRole::Manager));
    let calls = std::fs::read_to_string(dir.path().join("ncalls")).unwrap();
    assert_eq!(calls.lines().count(), 3);
}

#[tokio::test]
async fn server_version_is_a_plain_scalar() {
    let (_dir, docker) = fake_engine("echo 24.0.7");
    let version = docker.server_version(deadline()).await.unwrap();
    assert_eq!(version, "24.0.7");
}

#[tokio::test]
async fn context_flag_prefixes_every_invocation() {
    let (dir, docker) = {
        let (dir, _) = fake_engine("echo \"$@\" > __DIR__/argv");
        // Rebuild the client with a context configured.
        let config = ClientConfig {
            binary: dir.path().join("docker").display().to_string(),
            context: Some("remote".to_string()),
            ..ClientConfig::default()
        };
        (dir, Docker::with_config(config).unwrap())
    };

    docker.server_version(deadline()).await.unwrap();
    let argv = std::fs::read_to_string(dir.path().join("argv")).unwrap();
    assert!(argv.starts_with("--context remote"));
}
