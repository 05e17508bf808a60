//! Service and task operations.

use crate::classify::{parse, Error};
use crate::resource::{ImageRef, Service, ServiceDetail, ServiceId, Task, TaskState};
use crate::retry::Deadline;
use crate::watch;

use super::Docker;

/// Validated field accumulator for `service create`.
#[derive(Debug, Clone)]
pub struct ServiceOpts {
    name: String,
    image: ImageRef,
    replicas: Option<u64>,
    env: Vec<(String, String)>,
    publish: Vec<String>,
}

impl ServiceOpts {
    /// Options for a named service of the given image.
    #[must_use]
    pub fn new(name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            name: name.into(),
            image,
            replicas: None,
            env: Vec::new(),
            publish: Vec::new(),
        }
    }

    /// Set the replica count.
    #[must_use]
    pub fn replicas(mut self, replicas: u64) -> Self {
        self.replicas = Some(replicas);
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Publish a port, e.g. `8080:80`.
    #[must_use]
    pub fn publish(mut self, mapping: impl Into<String>) -> Self {
        self.publish.push(mapping.into());
        self
    }

    /// The `service create` argument vector.
    ///
    /// `--detach` keeps the CLI from blocking on convergence; waiting is
    /// the task waiter's job.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "service".to_string(),
            "create".to_string(),
            "--detach".to_string(),
            "--name".to_string(),
            self.name.clone(),
        ];
        if let Some(replicas) = self.replicas {
            args.push("--replicas".to_string());
            args.push(replicas.to_string());
        }
        for (key, value) in &self.env {
            args.push("--env".to_string());
            args.push(format!("{key}={value}"));
        }
        for mapping in &self.publish {
            args.push("--publish".to_string());
            args.push(mapping.clone());
        }
        args.push(self.image.to_string());
        args
    }
}

impl Docker {
    /// Create a service and return its id.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn create_service(
        &self,
        opts: &ServiceOpts,
        deadline: Deadline,
    ) -> Result<ServiceId, Error> {
        let inv = self.invocation(opts.to_args());
        let result = self.run(&self.rules().services, &inv, deadline).await?;
        ServiceId::new(parse::parse_scalar(&result))
    }

    /// Remove a service.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn remove_service(&self, id: &ServiceId, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "service".to_string(),
            "rm".to_string(),
            id.to_string(),
        ]);
        self.run(&self.rules().services, &inv, deadline).await?;
        Ok(())
    }

    /// List services.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn list_services(&self, deadline: Deadline) -> Result<Vec<Service>, Error> {
        let inv = self.invocation(vec![
            "service".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().services, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one service.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn inspect_service(
        &self,
        id: &ServiceId,
        deadline: Deadline,
    ) -> Result<ServiceDetail, Error> {
        let inv = self.invocation(vec![
            "service".to_string(),
            "inspect".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().services, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }

    /// List the tasks of one service.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn service_tasks(
        &self,
        id: &ServiceId,
        deadline: Deadline,
    ) -> Result<Vec<Task>, Error> {
        let inv = self.invocation(vec![
            "service".to_string(),
            "ps".to_string(),
            "--no-trunc".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().services, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Block until any task of the service reaches the wanted state.
    ///
    /// Task state has no filtered event feed, so this polls the task list
    /// on the configured interval against the shared deadline.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when no task converges in time.
    pub async fn wait_for_task_state(
        &self,
        id: &ServiceId,
        state: TaskState,
        deadline: Deadline,
    ) -> Result<Vec<Task>, Error> {
        watch::wait_until(
            self.config().poll_interval(),
            self.cancel_token(),
            deadline,
            || self.service_tasks(id, deadline),
            |tasks| tasks.iter().any(|t| t.is_in_state(state)),
        )
        .await
    }
}
