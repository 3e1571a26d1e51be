//! Archive data providers
//!
//! The archive lives in a git hosting service. Two seams reach it:
//! - `RevisionProvider`: commit history of one file within a date window
//! - `BlobProvider`: file content at a given revision (or branch)

pub mod github;
pub mod memory;
pub mod provider;

pub use github::{GitHubArchive, GitHubSettings};
pub use memory::StaticArchive;
pub use provider::{BlobProvider, RevisionProvider};
