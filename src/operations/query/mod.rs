mod length;
mod stop_ratio;

pub use length::Length;
pub use stop_ratio::{Approach, StopCondition, StopPredicate, StopRatio, DEFAULT_STOP_SAMPLES};
