//! Cluster config operations.

use crate::classify::{parse, Error};
use crate::resource::{ConfigDetail, ConfigName, ConfigRecord};
use crate::retry::Deadline;

use super::Docker;

impl Docker {
    /// Create a config from an in-memory payload.
    ///
    /// The payload travels over the child's stdin (`config create <name> -`)
    /// and never touches the filesystem.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn create_config(
        &self,
        name: &ConfigName,
        data: &[u8],
        deadline: Deadline,
    ) -> Result<ConfigName, Error> {
        let inv = self
            .invocation(vec![
                "config".to_string(),
                "create".to_string(),
                name.to_string(),
                "-".to_string(),
            ])
            .stdin_bytes(data.to_vec());
        let result = self.run(&self.rules().configs, &inv, deadline).await?;
        ConfigName::new(parse::parse_scalar(&result))
    }

    /// Remove a config.
    ///
    /// # Errors
    ///
    /// [`Error::InUse`] while a service still references it.
    pub async fn remove_config(&self, name: &ConfigName, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "config".to_string(),
            "rm".to_string(),
            name.to_string(),
        ]);
        self.run(&self.rules().configs, &inv, deadline).await?;
        Ok(())
    }

    /// List configs.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn list_configs(&self, deadline: Deadline) -> Result<Vec<ConfigRecord>, Error> {
        let inv = self.invocation(vec![
            "config".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().configs, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one config.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown name, among others.
    pub async fn inspect_config(
        &self,
        name: &ConfigName,
        deadline: Deadline,
    ) -> Result<ConfigDetail, Error> {
        let inv = self.invocation(vec![
            "config".to_string(),
            "inspect".to_string(),
            name.to_string(),
        ]);
        let result = self.run(&self.rules().configs, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_invocation_carries_stdin_payload() {
        let docker = Docker::new();
        let name = ConfigName::new("app.toml").unwrap();
        let inv = docker
            .invocation(vec![
                "config".to_string(),
                "create".to_string(),
                name.to_string(),
                "-".to_string(),
            ])
            .stdin_bytes(b"key = 1".to_vec());

        assert_eq!(inv.stdin_payload(), Some(b"key = 1".as_slice()));
        assert_eq!(inv.command_line().last().unwrap(), "-");
    }
}
