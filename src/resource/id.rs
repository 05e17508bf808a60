//! Typed resource identifiers.
//!
//! Every client API takes a typed identifier; parsing a user-supplied
//! string happens exactly once, at the boundary, where the format is
//! validated. An identifier can never be empty, contain whitespace, or
//! start with a dash (it would be read back as a flag by the engine CLI).

use std::fmt;
use std::str::FromStr;

use crate::classify::Error;

fn validate(kind: &str, value: &str, extra: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::InvalidArgument {
            detail: format!("{kind} identifier is empty"),
        });
    }
    if value.starts_with('-') {
        return Err(Error::InvalidArgument {
            detail: format!("{kind} identifier {value:?} starts with a dash"),
        });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "._-".contains(*c) || extra.contains(*c)))
    {
        return Err(Error::InvalidArgument {
            detail: format!("{kind} identifier {value:?} contains {bad:?}"),
        });
    }
    Ok(())
}

macro_rules! identifier {
    ($(#[$doc:meta])* $name:ident, $kind:literal, $extra:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap a raw identifier.
            ///
            /// # Errors
            ///
            /// Returns [`Error::InvalidArgument`] for a malformed value.
            pub fn new(value: impl Into<String>) -> Result<Self, Error> {
                let value = value.into();
                validate($kind, &value, $extra)?;
                Ok(Self(value))
            }

            /// The raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier!(
    /// A container id or name.
    ContainerId, "container", ""
);
identifier!(
    /// An image reference: name, name:tag, or name@digest.
    ImageRef, "image", ":/@"
);
identifier!(
    /// A network id or name.
    NetworkId, "network", ""
);
identifier!(
    /// A swarm node id or hostname.
    NodeId, "node", ""
);
identifier!(
    /// A service id or name.
    ServiceId, "service", ""
);
identifier!(
    /// A task id.
    TaskId, "task", ""
);
identifier!(
    /// A cluster config name.
    ConfigName, "config", ""
);
identifier!(
    /// A CLI context name.
    ContextName, "context", ""
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_identifiers() {
        assert!(ContainerId::new("abcdef123456").is_ok());
        assert!(ContainerId::new("web-1").is_ok());
        assert!(NodeId::new("manager.example").is_ok());
    }

    #[test]
    fn image_refs_allow_registry_syntax() {
        assert!(ImageRef::new("nginx:1.27").is_ok());
        assert!(ImageRef::new("registry.example:5000/team/app@sha256:abcd").is_ok());
    }

    #[test]
    fn rejects_empty_and_flag_like_values() {
        assert!(matches!(
            ContainerId::new(""),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            ContainerId::new("--rm"),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn rejects_whitespace() {
        assert!(ContainerId::new("a b").is_err());
        assert!(ImageRef::new("nginx latest").is_err());
    }

    #[test]
    fn from_str_round_trips() {
        let id: ContainerId = "abc123".parse().unwrap();
        assert_eq!(id.as_str(), "abc123");
        assert_eq!(id.to_string(), "abc123");
    }
}
