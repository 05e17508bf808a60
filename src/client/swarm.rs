//! Swarm membership operations.

use crate::classify::{parse, Error};
use crate::resource::SwarmInfo;
use crate::retry::Deadline;

use super::Docker;

impl Docker {
    /// Initialize a new swarm with this node as its first manager.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the node is already in a swarm.
    pub async fn swarm_init(
        &self,
        advertise_addr: Option<&str>,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let mut args = vec!["swarm".to_string(), "init".to_string()];
        if let Some(addr) = advertise_addr {
            args.push("--advertise-addr".to_string());
            args.push(addr.to_string());
        }
        let inv = self.invocation(args);
        self.run(&self.rules().swarm, &inv, deadline).await?;
        Ok(())
    }

    /// Join an existing swarm.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] when the node is already in a swarm,
    /// [`Error::DaemonUnreachable`] when the manager address is dead.
    pub async fn swarm_join(
        &self,
        manager_addr: &str,
        token: &str,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "swarm".to_string(),
            "join".to_string(),
            "--token".to_string(),
            token.to_string(),
            manager_addr.to_string(),
        ]);
        self.run(&self.rules().swarm, &inv, deadline).await?;
        Ok(())
    }

    /// Leave the swarm.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] when the node is not in a swarm.
    pub async fn swarm_leave(&self, force: bool, deadline: Deadline) -> Result<(), Error> {
        let mut args = vec!["swarm".to_string(), "leave".to_string()];
        if force {
            args.push("--force".to_string());
        }
        let inv = self.invocation(args);
        self.run(&self.rules().swarm, &inv, deadline).await?;
        Ok(())
    }

    /// Fetch this node's swarm membership state.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn swarm_info(&self, deadline: Deadline) -> Result<SwarmInfo, Error> {
        let inv = self.invocation(vec![
            "info".to_string(),
            "--format".to_string(),
            "{{json .Swarm}}".to_string(),
        ]);
        let result = self.run(&self.rules().swarm, &inv, deadline).await?;
        parse::parse_object(&result)
    }
}
