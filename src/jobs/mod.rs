pub mod apply_weights;
pub mod periodic;

pub use apply_weights::{ApplyWeightsError, ApplyWeightsJob, JobStatus};
pub use periodic::{
    hyperparams_refresh_task, metagraph_refresh_task, CommitRevealScheduler, StopSignal,
};
