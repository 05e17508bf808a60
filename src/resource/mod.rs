//! Typed identifiers and immutable resource snapshots.
//!
//! Snapshots are produced only by interpreting successful engine output and
//! are never mutated; reloading always performs a fresh round-trip that
//! yields a new value.

mod config;
mod container;
mod context;
mod id;
mod image;
mod network;
mod node;
mod service;
mod swarm;

pub use config::{ConfigDetail, ConfigRecord, ConfigSpec};
pub use container::{Container, ContainerConfig, ContainerDetail, ContainerState};
pub use context::{Context, ContextDetail, ContextEndpoint};
pub use id::{
    ConfigName, ContainerId, ContextName, ImageRef, NetworkId, NodeId, ServiceId, TaskId,
};
pub use image::{Image, ImageDetail};
pub use network::{Network, NetworkDetail, NetworkEndpoint};
pub use node::{ManagerStatus, Node, NodeDetail, NodeRole, NodeSpec, NodeStatus};
pub use service::{Service, ServiceDetail, ServiceSpec, Task, TaskState};
pub use swarm::SwarmInfo;
