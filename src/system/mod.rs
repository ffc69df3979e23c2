pub mod error;
pub mod highlight;
pub mod history;
pub mod sampler;
pub mod scheduler;
pub mod snapshot;
pub mod source;
