//! Chain query functions
//!
//! This module provides low-level functions for querying blockchain state.

pub mod chain_info;
pub mod commitments;
pub mod hyperparameters;
pub mod neurons;
pub mod neurons_bulk;
pub mod subnets;

pub use chain_info::*;
pub use neurons::*;
pub use subnets::*;
