//! Aggregate engine-wide queries.

use crate::classify::{parse, Error};
use crate::resource::{Container, Context, Image, Network};
use crate::retry::Deadline;

use super::Docker;

/// Point-in-time view across every locally queryable resource kind.
#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    /// All containers, including stopped ones.
    pub containers: Vec<Container>,
    /// All local images.
    pub images: Vec<Image>,
    /// All networks.
    pub networks: Vec<Network>,
    /// All configured contexts.
    pub contexts: Vec<Context>,
}

impl Docker {
    /// Gather every resource kind concurrently.
    ///
    /// The queries fan out in one structured scope: the first failure
    /// cancels the remaining siblings and propagates, so a partial failure
    /// is never silently dropped.
    ///
    /// # Errors
    ///
    /// The first error any sibling query produced.
    pub async fn snapshot(&self, deadline: Deadline) -> Result<SystemSnapshot, Error> {
        let (containers, images, networks, contexts) = tokio::try_join!(
            self.list_containers(true, deadline),
            self.list_images(deadline),
            self.list_networks(deadline),
            self.list_contexts(deadline),
        )?;

        Ok(SystemSnapshot {
            containers,
            images,
            networks,
            contexts,
        })
    }

    /// The engine daemon's version string.
    ///
    /// # Errors
    ///
    /// [`Error::DaemonUnreachable`] when no daemon answers, among others.
    pub async fn server_version(&self, deadline: Deadline) -> Result<String, Error> {
        let inv = self.invocation(vec![
            "version".to_string(),
            "--format".to_string(),
            "{{.Server.Version}}".to_string(),
        ]);
        let result = self.run(&self.rules().system, &inv, deadline).await?;
        Ok(parse::parse_scalar(&result))
    }
}
