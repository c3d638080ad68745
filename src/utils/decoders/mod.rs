/// Utilities for decoding Value from subxt storage results
pub mod composite;
pub mod fixed;
pub mod primitive;
mod utils;
pub mod vec;

pub use composite::*;
pub use fixed::*;
pub use primitive::*;
pub use vec::*;
