//! MLForge Cloud
//!
//! Provider ports for object storage, container clusters, monitoring, and
//! log groups, with:
//! - AWS adapters (`aws` module) built on the official SDK crates
//! - An in-memory provider (`InMemoryCloud`) for tests
//! - A retry policy for transient provider errors

pub mod aws;
pub mod error;
pub mod memory;
pub mod ports;
pub mod retry;
pub mod services;

pub use error::{CloudError, CloudResult};
pub use memory::InMemoryCloud;
pub use ports::{
    AlarmSpec, ClusterControl, ClusterState, CreateOutcome, LogGroups, Monitoring, ObjectStore,
};
pub use retry::RetryPolicy;
pub use services::CloudServices;
