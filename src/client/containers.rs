//! Container operations.

use crate::classify::{parse, Error};
use crate::exec::{self, StreamingChild};
use crate::resource::{Container, ContainerDetail, ContainerId, ImageRef, NetworkId};
use crate::retry::Deadline;
use crate::watch::{self, Subscription};

use super::Docker;

/// Validated field accumulator for `container create` / `container run`.
#[derive(Debug, Clone)]
pub struct CreateContainerOpts {
    image: ImageRef,
    name: Option<String>,
    env: Vec<(String, String)>,
    labels: Vec<(String, String)>,
    network: Option<NetworkId>,
    command: Vec<String>,
}

impl CreateContainerOpts {
    /// Options for a container of the given image.
    #[must_use]
    pub fn new(image: ImageRef) -> Self {
        Self {
            image,
            name: None,
            env: Vec::new(),
            labels: Vec::new(),
            network: None,
            command: Vec::new(),
        }
    }

    /// Assign a container name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Add a label.
    #[must_use]
    pub fn label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self
    }

    /// Attach to a network.
    #[must_use]
    pub fn network(mut self, network: NetworkId) -> Self {
        self.network = Some(network);
        self
    }

    /// Override the container command.
    #[must_use]
    pub fn command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    fn push_flags(&self, args: &mut Vec<String>) {
        if let Some(name) = &self.name {
            args.push("--name".to_string());
            args.push(name.clone());
        }
        for (key, value) in &self.env {
            args.push("--env".to_string());
            args.push(format!("{key}={value}"));
        }
        for (key, value) in &self.labels {
            args.push("--label".to_string());
            args.push(format!("{key}={value}"));
        }
        if let Some(network) = &self.network {
            args.push("--network".to_string());
            args.push(network.to_string());
        }
    }

    /// The `container create` argument vector.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["container".to_string(), "create".to_string()];
        self.push_flags(&mut args);
        args.push(self.image.to_string());
        args.extend(self.command.iter().cloned());
        args
    }

    /// The detached `container run` argument vector.
    #[must_use]
    pub fn to_run_args(&self) -> Vec<String> {
        let mut args = vec![
            "container".to_string(),
            "run".to_string(),
            "--detach".to_string(),
        ];
        self.push_flags(&mut args);
        args.push(self.image.to_string());
        args.extend(self.command.iter().cloned());
        args
    }
}

/// Both output streams of `container logs`.
#[derive(Debug, Clone)]
pub struct ContainerLogs {
    /// The container process's stdout.
    pub stdout: String,
    /// The container process's stderr.
    pub stderr: String,
}

/// Target states the event waiter can block on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerTarget {
    /// The container process is up.
    Running,
    /// The container process has stopped.
    Exited,
}

impl ContainerTarget {
    /// Feed actions that may complete the transition. A matching event is
    /// only a hint; authoritative state is re-queried before returning.
    #[must_use]
    pub fn terminal_actions(self) -> &'static [&'static str] {
        match self {
            Self::Running => &["start", "restart", "unpause"],
            Self::Exited => &["die", "stop", "kill", "oom"],
        }
    }

    /// Whether an inspected container satisfies the target.
    #[must_use]
    pub fn matches(self, detail: &ContainerDetail) -> bool {
        match self {
            Self::Running => detail.state.running,
            Self::Exited => detail.state.status == "exited",
        }
    }
}

impl Docker {
    /// Create a container and return its id.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn create_container(
        &self,
        opts: &CreateContainerOpts,
        deadline: Deadline,
    ) -> Result<ContainerId, Error> {
        let inv = self.invocation(opts.to_args());
        let result = self.run(&self.rules().containers, &inv, deadline).await?;
        ContainerId::new(parse::parse_scalar(&result))
    }

    /// Create and start a container in one step, detached.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn run_container(
        &self,
        opts: &CreateContainerOpts,
        deadline: Deadline,
    ) -> Result<ContainerId, Error> {
        let inv = self.invocation(opts.to_run_args());
        let result = self.run(&self.rules().containers, &inv, deadline).await?;
        ContainerId::new(parse::parse_scalar(&result))
    }

    /// Start a created or stopped container.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn start_container(
        &self,
        id: &ContainerId,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let inv = self.invocation(vec!["container".to_string(), "start".to_string(), id.to_string()]);
        self.run(&self.rules().containers, &inv, deadline).await?;
        Ok(())
    }

    /// Stop a running container.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn stop_container(&self, id: &ContainerId, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec!["container".to_string(), "stop".to_string(), id.to_string()]);
        self.run(&self.rules().containers, &inv, deadline).await?;
        Ok(())
    }

    /// Remove a container.
    ///
    /// # Errors
    ///
    /// [`Error::InUse`] when it is still running and `force` is false.
    pub async fn remove_container(
        &self,
        id: &ContainerId,
        force: bool,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let mut args = vec!["container".to_string(), "rm".to_string()];
        if force {
            args.push("--force".to_string());
        }
        args.push(id.to_string());
        let inv = self.invocation(args);
        self.run(&self.rules().containers, &inv, deadline).await?;
        Ok(())
    }

    /// List containers, optionally including stopped ones.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn list_containers(
        &self,
        all: bool,
        deadline: Deadline,
    ) -> Result<Vec<Container>, Error> {
        let mut args = vec!["container".to_string(), "ls".to_string()];
        if all {
            args.push("--all".to_string());
        }
        args.push("--format".to_string());
        args.push("{{json .}}".to_string());
        let inv = self.invocation(args);
        let result = self.run(&self.rules().containers, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one container.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn inspect_container(
        &self,
        id: &ContainerId,
        deadline: Deadline,
    ) -> Result<ContainerDetail, Error> {
        let inv = self.invocation(vec![
            "container".to_string(),
            "inspect".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().containers, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }

    /// Fetch both log streams of a container.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn container_logs(
        &self,
        id: &ContainerId,
        deadline: Deadline,
    ) -> Result<ContainerLogs, Error> {
        let inv = self.invocation(vec![
            "container".to_string(),
            "logs".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().containers, &inv, deadline).await?;
        Ok(ContainerLogs {
            stdout: result.stdout().to_string(),
            stderr: result.stderr().to_string(),
        })
    }

    /// Block until the container reaches the target state.
    ///
    /// Subscribes to the engine's event feed, filtered server-side to this
    /// container, and re-verifies authoritative state on every candidate
    /// event. Returns immediately when the state already matches.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the deadline passes first,
    /// [`Error::Interrupted`] on cancellation.
    pub async fn wait_for_container_state(
        &self,
        id: &ContainerId,
        target: ContainerTarget,
        deadline: Deadline,
    ) -> Result<ContainerDetail, Error> {
        let sub = Subscription {
            invocation: self.events_invocation(Some(id)),
            classifier: self.classifier(),
            rules: &self.rules().containers,
            term_exit_codes: &self.config().term_exit_codes,
            cancel: self.cancel_token().cloned(),
        };

        watch::await_state(
            sub,
            id.as_str(),
            target.terminal_actions(),
            || self.inspect_container(id, deadline),
            |detail| target.matches(detail),
            deadline,
        )
        .await
    }

    /// Open the live container event feed, optionally filtered to one
    /// container.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the feed subprocess cannot be started.
    pub fn stream_container_events(
        &self,
        id: Option<&ContainerId>,
    ) -> Result<StreamingChild, Error> {
        exec::stream(&self.events_invocation(id))
    }

    fn events_invocation(&self, id: Option<&ContainerId>) -> crate::exec::Invocation {
        let mut args = vec![
            "events".to_string(),
            "--filter".to_string(),
            "type=container".to_string(),
        ];
        if let Some(id) = id {
            args.push("--filter".to_string());
            args.push(format!("container={id}"));
        }
        args.push("--format".to_string());
        args.push("{{json .}}".to_string());
        self.invocation(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_args_carry_flags_before_image() {
        let opts = CreateContainerOpts::new(ImageRef::new("nginx:1.27").unwrap())
            .name("web")
            .env("MODE", "prod")
            .label("tier", "front")
            .command(["nginx", "-g", "daemon off;"]);

        let args = opts.to_args();
        assert_eq!(args[0], "container");
        assert_eq!(args[1], "create");
        let image_pos = args.iter().position(|a| a == "nginx:1.27").unwrap();
        let name_pos = args.iter().position(|a| a == "--name").unwrap();
        assert!(name_pos < image_pos);
        assert!(args.contains(&"MODE=prod".to_string()));
        assert!(args.contains(&"tier=front".to_string()));
        assert_eq!(args.last().unwrap(), "daemon off;");
    }

    #[test]
    fn run_args_are_detached() {
        let opts = CreateContainerOpts::new(ImageRef::new("nginx").unwrap());
        let args = opts.to_run_args();
        assert!(args.contains(&"--detach".to_string()));
    }

    #[test]
    fn events_invocation_filters_by_container() {
        let docker = Docker::new();
        let id = ContainerId::new("abc123").unwrap();
        let inv = docker.events_invocation(Some(&id));
        let line = inv.command_line();
        assert!(line.contains(&"container=abc123".to_string()));
        assert!(line.contains(&"{{json .}}".to_string()));
    }

    #[test]
    fn target_actions_differ_per_state() {
        assert!(ContainerTarget::Running.terminal_actions().contains(&"start"));
        assert!(ContainerTarget::Exited.terminal_actions().contains(&"die"));
    }
}
