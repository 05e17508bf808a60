//! Public operations over the engine CLI.
//!
//! [`Docker`] is the facade: it owns the binary path, the active context,
//! the retry policy, and one classification rule table per resource domain.
//! Every operation builds an argument vector, runs it through the retry
//! layer, and interprets the result; the per-domain files add the typed
//! surface on top.

mod configs;
mod containers;
mod contexts;
mod images;
mod networks;
mod nodes;
mod services;
mod swarm;
mod system;

pub use containers::{ContainerLogs, ContainerTarget, CreateContainerOpts};
pub use images::{BuildOpts, BuildReport};
pub use nodes::NodeAvailability;
pub use services::ServiceOpts;
pub use system::SystemSnapshot;

use tokio_util::sync::CancellationToken;

use crate::classify::{Classifier, Error, RuleSet};
use crate::config::ClientConfig;
use crate::exec::{self, CommandResult, Invocation};
use crate::resource::ContextName;
use crate::retry::{Deadline, Retry};

/// One classification rule table per resource domain, kept independent so
/// one domain's patterns cannot shadow another's.
#[derive(Debug)]
pub(crate) struct DomainRules {
    pub containers: RuleSet,
    pub images: RuleSet,
    pub networks: RuleSet,
    pub nodes: RuleSet,
    pub services: RuleSet,
    pub configs: RuleSet,
    pub contexts: RuleSet,
    pub swarm: RuleSet,
    pub build: RuleSet,
    pub system: RuleSet,
}

impl DomainRules {
    fn new() -> Self {
        Self {
            containers: RuleSet::containers(),
            images: RuleSet::images(),
            networks: RuleSet::networks(),
            nodes: RuleSet::nodes(),
            services: RuleSet::services(),
            configs: RuleSet::configs(),
            contexts: RuleSet::contexts(),
            swarm: RuleSet::swarm(),
            build: RuleSet::build(),
            system: RuleSet::system(),
        }
    }
}

/// Typed client over the engine CLI.
pub struct Docker {
    config: ClientConfig,
    context: Option<ContextName>,
    retry: Retry,
    classifier: Classifier,
    rules: DomainRules,
    cancel: Option<CancellationToken>,
}

impl Docker {
    /// A client with default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = ClientConfig::default();
        Self {
            retry: Retry::new(config.retry_interval()),
            context: None,
            classifier: Classifier::new(),
            rules: DomainRules::new(),
            cancel: None,
            config,
        }
    }

    /// A client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when the configured context name
    /// is malformed.
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let context = config
            .context
            .as_deref()
            .map(ContextName::new)
            .transpose()?;
        Ok(Self {
            retry: Retry::new(config.retry_interval()),
            context,
            classifier: Classifier::new(),
            rules: DomainRules::new(),
            cancel: None,
            config,
        })
    }

    /// Attach a cancellation token checked during retries and waits.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.retry = self.retry.clone().with_cancellation(cancel.clone());
        self.cancel = Some(cancel);
        self
    }

    /// Select the context prepended to every invocation.
    pub fn use_context(&mut self, context: ContextName) {
        tracing::info!(context = %context, "switching active context");
        self.context = Some(context);
    }

    /// Clear the active context.
    pub fn clear_context(&mut self) {
        self.context = None;
    }

    /// The currently selected context, if any.
    #[must_use]
    pub fn current_context(&self) -> Option<&ContextName> {
        self.context.as_ref()
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    pub(crate) fn rules(&self) -> &DomainRules {
        &self.rules
    }

    pub(crate) fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Build an invocation of the engine binary, with the active context
    /// flag prepended when one is selected.
    pub(crate) fn invocation<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inv = Invocation::new(&self.config.binary);
        if let Some(context) = &self.context {
            inv = inv.arg("--context").arg(context.as_str());
        }
        inv.args(args)
    }

    /// Execute one logical operation: run the invocation under the retry
    /// policy and interpret the outcome against the domain's rule table.
    pub(crate) async fn run(
        &self,
        rules: &RuleSet,
        invocation: &Invocation,
        deadline: Deadline,
    ) -> Result<CommandResult, Error> {
        let classifier = &self.classifier;
        self.retry
            .retry(deadline, move || async move {
                let result = exec::run(invocation).await?;
                classifier.interpret(rules, result)
            })
            .await
    }
}

impl Default for Docker {
    fn default() -> Self {
        Self::new()
    }
}
