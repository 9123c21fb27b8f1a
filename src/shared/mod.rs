//! Shared types used by both the tracer and the result formatting.

pub mod timing;

pub use timing::{LifecycleEvent, LifecycleListener, Phase, TimingTrace};
