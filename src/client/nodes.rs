//! Swarm node operations.

use crate::classify::{parse, Error};
use crate::resource::{Node, NodeDetail, NodeId, NodeRole};
use crate::retry::Deadline;
use crate::watch;

use super::Docker;

/// Scheduling availability of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAvailability {
    Active,
    Pause,
    Drain,
}

impl NodeAvailability {
    /// The flag value the engine expects.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pause => "pause",
            Self::Drain => "drain",
        }
    }
}

impl Docker {
    /// List cluster nodes.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn list_nodes(&self, deadline: Deadline) -> Result<Vec<Node>, Error> {
        let inv = self.invocation(vec![
            "node".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().nodes, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one node.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn inspect_node(
        &self,
        id: &NodeId,
        deadline: Deadline,
    ) -> Result<NodeDetail, Error> {
        let inv = self.invocation(vec![
            "node".to_string(),
            "inspect".to_string(),
            id.to_string(),
        ]);
        let result = self.run(&self.rules().nodes, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }

    /// Promote a worker to manager.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn promote_node(&self, id: &NodeId, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "node".to_string(),
            "promote".to_string(),
            id.to_string(),
        ]);
        self.run(&self.rules().nodes, &inv, deadline).await?;
        Ok(())
    }

    /// Demote a manager to worker.
    ///
    /// # Errors
    ///
    /// [`Error::PermissionDenied`] on a non-manager node, among others.
    pub async fn demote_node(&self, id: &NodeId, deadline: Deadline) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "node".to_string(),
            "demote".to_string(),
            id.to_string(),
        ]);
        self.run(&self.rules().nodes, &inv, deadline).await?;
        Ok(())
    }

    /// Change a node's scheduling availability.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown id, among others.
    pub async fn update_node_availability(
        &self,
        id: &NodeId,
        availability: NodeAvailability,
        deadline: Deadline,
    ) -> Result<(), Error> {
        let inv = self.invocation(vec![
            "node".to_string(),
            "update".to_string(),
            "--availability".to_string(),
            availability.as_str().to_string(),
            id.to_string(),
        ]);
        self.run(&self.rules().nodes, &inv, deadline).await?;
        Ok(())
    }

    /// Block until the node reports the wanted role.
    ///
    /// Role changes propagate asynchronously after a promote or demote and
    /// have no event feed, so this polls fresh snapshots on the configured
    /// interval against the shared deadline.
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the role never converges in time.
    pub async fn wait_for_node_role(
        &self,
        id: &NodeId,
        role: NodeRole,
        deadline: Deadline,
    ) -> Result<NodeDetail, Error> {
        watch::wait_until(
            self.config().poll_interval(),
            self.cancel_token(),
            deadline,
            || self.inspect_node(id, deadline),
            |node| node.role() == Some(role),
        )
        .await
    }
}
