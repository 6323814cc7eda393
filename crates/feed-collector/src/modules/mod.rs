//! 수집 워크플로우 모듈.

pub mod price_update;

pub use price_update::{run_update, UpdateOutcome};
