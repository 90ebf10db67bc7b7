pub mod cycle;
pub mod scheduler;

pub use cycle::{CycleOutcome, ForwardCycle};
pub use scheduler::Scheduler;
