mod method;
mod plan;
mod record;
mod step;

pub use method::Method;
pub use plan::Plan;
pub use record::{
    ExecutionRecord, RequestSnapshot, ResponseSnapshot, RunStatus, StepResult, StepStatus,
};
pub use step::Step;
