//! Data-parallel mode detection.
//!
//! Gradient coordination itself is the framework's job; this module only
//! decides whether distributed mode is active, which collective backend to
//! ask for, and which rank coordinates side effects like checkpoint
//! uploads.

use candle_core::Device;

/// Collective-communication backend requested from the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectiveBackend {
    /// Accelerator-native collectives.
    Nccl,
    /// CPU-compatible fallback.
    Gloo,
}

/// Identity of this process within a data-parallel group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedContext {
    pub rank: usize,
    pub world_size: usize,
    pub backend: CollectiveBackend,
}

impl DistributedContext {
    /// Build from the launcher-provided `RANK`/`WORLD_SIZE` variables.
    /// `None` when either is absent or unparseable, meaning single-process
    /// training.
    #[must_use]
    pub fn from_env(device: &Device) -> Option<Self> {
        Self::from_vars(
            std::env::var("RANK").ok().as_deref(),
            std::env::var("WORLD_SIZE").ok().as_deref(),
            device,
        )
    }

    fn from_vars(rank: Option<&str>, world_size: Option<&str>, device: &Device) -> Option<Self> {
        let rank: usize = rank?.parse().ok()?;
        let world_size: usize = world_size?.parse().ok()?;
        let backend =
            if device.is_cuda() { CollectiveBackend::Nccl } else { CollectiveBackend::Gloo };
        Some(Self { rank, world_size, backend })
    }

    /// Rank 0 owns group-wide side effects.
    #[must_use]
    pub fn is_coordinator(&self) -> bool {
        self.rank == 0
    }
}
