//! CLI context operations.

use crate::classify::{parse, Error};
use crate::resource::{Context, ContextDetail, ContextName};
use crate::retry::Deadline;

use super::Docker;

impl Docker {
    /// List configured contexts.
    ///
    /// # Errors
    ///
    /// Classified engine errors, [`Error::Timeout`] past the deadline.
    pub async fn list_contexts(&self, deadline: Deadline) -> Result<Vec<Context>, Error> {
        let inv = self.invocation(vec![
            "context".to_string(),
            "ls".to_string(),
            "--format".to_string(),
            "{{json .}}".to_string(),
        ]);
        let result = self.run(&self.rules().contexts, &inv, deadline).await?;
        parse::parse_lines(&result)
    }

    /// Fetch a fresh detailed snapshot of one context.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for an unknown name, among others.
    pub async fn inspect_context(
        &self,
        name: &ContextName,
        deadline: Deadline,
    ) -> Result<ContextDetail, Error> {
        let inv = self.invocation(vec![
            "context".to_string(),
            "inspect".to_string(),
            name.to_string(),
        ]);
        let result = self.run(&self.rules().contexts, &inv, deadline).await?;
        parse::parse_inspect_one(&result)
    }

    /// Verify a context exists, then select it for subsequent invocations.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the context is not configured.
    pub async fn switch_context(
        &mut self,
        name: ContextName,
        deadline: Deadline,
    ) -> Result<(), Error> {
        self.inspect_context(&name, deadline).await?;
        self.use_context(name);
        Ok(())
    }
}
