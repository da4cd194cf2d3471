//! Multi-file dataset handling.
//!
//! This module handles:
//! - Resolving which files in a directory form one dataset, in rank order
//! - Assembling every rank file of a dataset from its rank-0 anchor
//! - Checking that communications only reference tasks of the dataset

pub mod assembler;
pub mod comm_links;
pub mod resolver;

// Re-export main functions
pub use assembler::{assemble_dataset, membership, Assembly, Membership, RankInfo};
pub use comm_links::{check_comm_links, comm_links_valid};
pub use resolver::{rank_index, resolve};
