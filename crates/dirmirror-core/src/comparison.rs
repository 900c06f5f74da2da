//! Content fingerprinting and snapshot comparison
//!
//! This module provides read-only analysis of two trees:
//! - Content identity via streamed SHA-256 hashing
//! - Key-set diffing of snapshots into an ordered operation plan

mod diff;
mod hash;

pub use diff::{SnapshotDiff, plan};
pub use hash::{FileHasher, Fingerprint};
