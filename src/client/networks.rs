//! Network operations.

use crate::classify::{parse, Error};
use crate::resource::{Network, NetworkDetail, NetworkId};
use crate::retry::Deadline;

use super::Docker;

impl Docker {
    /// Create a network and return its id.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn create_network(
        &self,
        name: &NetworkId,
        driver: Option<&str>,
        deadline: Deadline,
    ) -> Result<NetworkId, Error> {
        let mut args = vec!["network".to_string(), "create".to_string()];
        if let Some(driver) = driver {
            args.push("--driver".to_string());
            args.push(driver.to_string());
        }
        args.push(name.to_string());
        let inv = self.invocation(args);
        let result = self.run(&self.rules().networks, &inv, deadline).await?;
        NetworkId::new(parse::parse_scalar(&result))
    }

    /// Remove a network.
    ///
    /// # Errors
    ///
    /// [`Error::InUse`] while endpoints are still attached.
    pub async fn remove_network(&self, id: &NetworkId, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "network".to_string(),
            "rm".to_string(),
            id.to_string(),
        ]);
        self.run(&self.rules().networks, &inv, deadline).await?;
        Ok(())
    }

    /// List networks.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn list_networks(&self, deadline: Deadline) -> Result<Vec<Network>, Error> {
        let inv = self.invocation(vec![
            "network".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().networks, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one network.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn inspect_network(
        &self,
        id: &NetworkId,
        deadline: Deadline,
    ) -> Result<NetworkDetail, Error> {
        let inv = self.invocation(vec![
            "network".to_string(),
            "inspect".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().networks, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }
}
