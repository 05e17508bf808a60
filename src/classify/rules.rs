//! Ordered classification rules for engine error output.
//!
//! One table per resource domain, tested top to bottom against the
//! noise-stripped stderr text; the first match wins. Message wording differs
//! across engine versions, so several rules may map to the same error kind.
//! Patterns are anchored narrowly enough that no two rules of one table can
//! match the same input; the tests below hold a synthetic corpus to that.

use regex::Regex;

use super::{Error, ResourceKind};

/// How a rule turns its captures into a typed error.
#[derive(Debug, Clone)]
enum RuleKind {
    NotFound(ResourceKind),
    InUse(ResourceKind),
    PermissionDenied,
    Unsupported {
        feature: &'static str,
        remediation: &'static str,
    },
    InvalidArgument,
    DaemonUnreachable,
}

/// One classification rule: a pattern and the error it produces.
///
/// Patterns use a named `id` capture where the message carries a resource
/// identifier; the full matched line becomes the detail text otherwise.
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    kind: RuleKind,
}

impl Rule {
    fn apply(&self, text: &str) -> Option<Error> {
        let caps = self.pattern.captures(text)?;
        let matched = caps.get(0).map_or("", |m| m.as_str()).trim().to_string();
        let id = caps.name("id").map(|m| m.as_str().to_string());

        Some(match &self.kind {
            RuleKind::NotFound(kind) => Error::NotFound {
                kind: *kind,
                id: id.unwrap_or_else(|| matched.clone()),
            },
            RuleKind::InUse(kind) => Error::InUse {
                kind: *kind,
                id: id.unwrap_or_default(),
                detail: matched,
            },
            RuleKind::PermissionDenied => Error::PermissionDenied { detail: matched },
            RuleKind::Unsupported {
                feature,
                remediation,
            } => Error::Unsupported {
                feature: (*feature).to_string(),
                remediation: (*remediation).to_string(),
            },
            RuleKind::InvalidArgument => Error::InvalidArgument { detail: matched },
            RuleKind::DaemonUnreachable => Error::DaemonUnreachable { detail: matched },
        })
    }
}

fn rule(pattern: &str, kind: RuleKind) -> Rule {
    Rule {
        pattern: Regex::new(pattern).expect("rule patterns are statically valid"),
        kind,
    }
}

/// A priority-ordered rule table for one resource domain.
#[derive(Debug)]
pub struct RuleSet {
    domain: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// The domain this table belongs to.
    #[must_use]
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Test the rules in priority order; the first match wins.
    #[must_use]
    pub fn classify(&self, text: &str) -> Option<Error> {
        self.rules.iter().find_map(|r| r.apply(text))
    }

    #[cfg(test)]
    fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules for `container` subcommands.
    #[must_use]
    pub fn containers() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: No such container: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Container),
            ),
            // Older CLIs report the same condition without the daemon prefix.
            rule(
                r"(?m)^Error: No such container: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Container),
            ),
            rule(
                r#"(?m)^Error response from daemon: cannot remove container "?/?(?P<id>[^":\s]+)"?: container is (running|paused|restarting)"#,
                RuleKind::InUse(ResourceKind::Container),
            ),
            // Wording used before the 20.x message rewrite.
            rule(
                r"(?m)^Error response from daemon: You cannot remove a running container (?P<id>\S+)",
                RuleKind::InUse(ResourceKind::Container),
            ),
            rule(
                r"(?m)^Error response from daemon: Container (?P<id>\S+) is not running",
                RuleKind::InvalidArgument,
            ),
            rule(
                r#"(?m)^docker: Error response from daemon: Conflict\. The container name "/(?P<id>[^"]+)" is already in use"#,
                RuleKind::InUse(ResourceKind::Container),
            ),
        ];
        rules.extend(common_rules());
        Self {
            domain: "containers",
            rules,
        }
    }

    /// Rules for `image` subcommands.
    #[must_use]
    pub fn images() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: No such image: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Image),
            ),
            rule(
                r"(?m)^Error: No such image: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Image),
            ),
            rule(
                r"(?m)^Error response from daemon: manifest for (?P<id>\S+) not found",
                RuleKind::NotFound(ResourceKind::Image),
            ),
            rule(
                r"(?m)^Error response from daemon: pull access denied for (?P<id>\S+), repository does not exist",
                RuleKind::NotFound(ResourceKind::Image),
            ),
            rule(
                r#"(?m)^Error response from daemon: conflict: unable to remove repository reference "(?P<id>[^"]+)""#,
                RuleKind::InUse(ResourceKind::Image),
            ),
            rule(
                r"(?m)^Error response from daemon: conflict: unable to delete (?P<id>\S+) \((must be forced|cannot be forced)\)",
                RuleKind::InUse(ResourceKind::Image),
            ),
        ];
        rules.extend(common_rules());
        Self {
            domain: "images",
            rules,
        }
    }

    /// Rules for `network` subcommands.
    #[must_use]
    pub fn networks() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: network (?P<id>\S+) not found",
                RuleKind::NotFound(ResourceKind::Network),
            ),
            rule(
                r"(?m)^Error: No such network: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Network),
            ),
            rule(
                r"(?m)^Error response from daemon: error while removing network: network (?P<id>\S+) id \S+ has active endpoints",
                RuleKind::InUse(ResourceKind::Network),
            ),
            rule(
                r#"(?m)^Error response from daemon: network "?(?P<id>[^"\s]+)"? is in use by (container|service)"#,
                RuleKind::InUse(ResourceKind::Network),
            ),
        ];
        rules.extend(common_rules());
        Self {
            domain: "networks",
            rules,
        }
    }

    /// Rules for `node` subcommands.
    #[must_use]
    pub fn nodes() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: node (?P<id>\S+) not found",
                RuleKind::NotFound(ResourceKind::Node),
            ),
            rule(
                r"(?m)^Error: no such node: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Node),
            ),
            rule(
                r"(?m)^Error response from daemon: node (?P<id>\S+) is not down and can't be removed",
                RuleKind::InUse(ResourceKind::Node),
            ),
        ];
        rules.extend(swarm_admin_rules());
        rules.extend(common_rules());
        Self {
            domain: "nodes",
            rules,
        }
    }

    /// Rules for `service` subcommands.
    #[must_use]
    pub fn services() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: service (?P<id>\S+) not found",
                RuleKind::NotFound(ResourceKind::Service),
            ),
            rule(
                r"(?m)^Error: no such service: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Service),
            ),
            rule(
                r"(?m)^Error response from daemon: rpc error: code = AlreadyExists desc = service (?P<id>\S+) already exists",
                RuleKind::InUse(ResourceKind::Service),
            ),
        ];
        rules.extend(swarm_admin_rules());
        rules.extend(common_rules());
        Self {
            domain: "services",
            rules,
        }
    }

    /// Rules for `config` subcommands.
    #[must_use]
    pub fn configs() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^Error response from daemon: config (?P<id>\S+) not found",
                RuleKind::NotFound(ResourceKind::Config),
            ),
            rule(
                r"(?m)^Error: no such config: (?P<id>\S+)",
                RuleKind::NotFound(ResourceKind::Config),
            ),
            rule(
                r"(?m)^Error response from daemon: rpc error: code = InvalidArgument desc = config '(?P<id>[^']+)' is in use by the following service",
                RuleKind::InUse(ResourceKind::Config),
            ),
        ];
        rules.extend(swarm_admin_rules());
        rules.extend(common_rules());
        Self {
            domain: "configs",
            rules,
        }
    }

    /// Rules for `context` subcommands.
    #[must_use]
    pub fn contexts() -> Self {
        let mut rules = vec![
            rule(
                r#"(?m)^context "(?P<id>[^"]+)" does not exist"#,
                RuleKind::NotFound(ResourceKind::Context),
            ),
            rule(
                r#"(?m)^context "(?P<id>[^"]+)": context not found"#,
                RuleKind::NotFound(ResourceKind::Context),
            ),
            rule(
                r#"(?m)^context "(?P<id>[^"]+)" is in use, set -f flag to force remove"#,
                RuleKind::InUse(ResourceKind::Context),
            ),
            rule(
                r#"(?m)^context "(?P<id>[^"]+)" already exists"#,
                RuleKind::InvalidArgument,
            ),
        ];
        rules.extend(common_rules());
        Self {
            domain: "contexts",
            rules,
        }
    }

    /// Rules for `swarm` subcommands.
    #[must_use]
    pub fn swarm() -> Self {
        let mut rules = vec![rule(
            r"(?m)^Error response from daemon: This node is already part of a swarm\.",
            RuleKind::InvalidArgument,
        )];
        rules.extend(swarm_admin_rules());
        rules.extend(common_rules());
        Self {
            domain: "swarm",
            rules,
        }
    }

    /// Rules for engine-wide operations with no domain of their own.
    #[must_use]
    pub fn system() -> Self {
        Self {
            domain: "system",
            rules: common_rules(),
        }
    }

    /// Rules for `image build`.
    #[must_use]
    pub fn build() -> Self {
        let mut rules = vec![
            rule(
                r"(?m)^ERROR: BuildKit is enabled but the buildx component is missing or broken",
                RuleKind::Unsupported {
                    feature: "BuildKit builds",
                    remediation: "install the docker-buildx plugin or set DOCKER_BUILDKIT=0",
                },
            ),
            rule(
                r"(?m)^Error response from daemon: squash is only supported with experimental mode",
                RuleKind::Unsupported {
                    feature: "--squash",
                    remediation: "enable experimental mode on the daemon or drop --squash",
                },
            ),
            rule(
                r"(?m)^the --chmod option requires BuildKit",
                RuleKind::Unsupported {
                    feature: "--chmod",
                    remediation: "re-run the build with DOCKER_BUILDKIT=1",
                },
            ),
            rule(
                r"(?m)^ERROR: failed to solve: failed to read dockerfile: open (?P<id>\S+): no such file or directory",
                RuleKind::InvalidArgument,
            ),
            rule(
                r#"(?m)^unable to prepare context: path "(?P<id>[^"]+)" not found"#,
                RuleKind::InvalidArgument,
            ),
        ];
        rules.extend(common_rules());
        Self {
            domain: "build",
            rules,
        }
    }
}

/// Swarm administrative rules shared by every cluster-scoped domain.
///
/// The not-a-manager message exists in two wordings across engine versions;
/// both map to the same permission error.
fn swarm_admin_rules() -> Vec<Rule> {
    vec![
        rule(
            r#"(?m)^Error response from daemon: This node is not a swarm manager\. Use "docker swarm init""#,
            RuleKind::PermissionDenied,
        ),
        rule(
            r"(?m)^Error response from daemon: This node is not a swarm manager\. Worker nodes",
            RuleKind::PermissionDenied,
        ),
        rule(
            r"(?m)^Error response from daemon: This node is not part of a swarm",
            RuleKind::PermissionDenied,
        ),
    ]
}

/// Rules every domain shares: daemon reachability, socket permissions, and
/// malformed references.
fn common_rules() -> Vec<Rule> {
    vec![
        rule(
            r"(?m)^Cannot connect to the Docker daemon at (?P<id>\S+)",
            RuleKind::DaemonUnreachable,
        ),
        rule(
            r"(?m)^error during connect: ",
            RuleKind::DaemonUnreachable,
        ),
        rule(
            r"dial unix \S+: connect: no such file or directory",
            RuleKind::DaemonUnreachable,
        ),
        rule(
            r"permission denied while trying to connect to the Docker daemon socket",
            RuleKind::PermissionDenied,
        ),
        rule(
            r"(?m)^invalid reference format",
            RuleKind::InvalidArgument,
        ),
        rule(
            r"(?m)^unknown flag: (?P<id>.+)",
            RuleKind::InvalidArgument,
        ),
    ]
}
