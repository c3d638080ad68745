pub mod commitments;
pub mod weights;

pub use commitments::set_commitment;
pub use weights::{commit_weights, reveal_weights, set_weights};
