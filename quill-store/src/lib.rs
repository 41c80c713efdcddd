//! # quill-store: durable artifact storage
//!
//! Key/value byte storage for generated report artifacts. Keys are a pure
//! function of (owner, job) — see [`artifact_key`] — so the status surface
//! can probe completion by existence alone, with no side-channel state.
//! Overwriting a key with equivalent content is safe by contract: the
//! queue's at-least-once delivery means a slow-but-successful render can
//! be repeated, and both runs must converge on the same stored artifact.
//!
//! Backends: [`MemoryStore`] for tests and [`FsStore`] for durable
//! single-node deployments (content file plus JSON metadata sidecar,
//! written via temp-file rename so overwrites are atomic).

pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use fs::FsStore;
pub use key::artifact_key;
pub use memory::MemoryStore;
pub use store::{Artifact, ArtifactHead, ArtifactStore};
