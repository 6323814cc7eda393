//! 도메인 타입 정의.

pub mod instrument;
pub mod market;
pub mod series;
