//! Shared data model: step records, unit records and the canonical step order.

pub mod record;
pub mod step_order;

pub use record::{DuplicatePolicy, StepRecord, StepUpdate, UnitRecord};
pub use step_order::StepOrder;
