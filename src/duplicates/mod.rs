//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Grouping hashed files by digest ([`index`])
//! - Turning digest groups into removal plans ([`policy`])

pub mod index;
pub mod policy;

pub use index::ChecksumIndex;
pub use policy::{
    dedup_against_reference, dedup_within_tree, keep_order, PlannedRemoval, RemovalPlan,
    RemovalReason,
};
