//! 장 마감 후 가격 데이터를 갱신하는 수집기.
//!
//! 스케줄러(GitHub Actions)가 하루 두 번, 한국장과 미국장 종료 후에
//! 실행합니다. 이 crate는 다음을 제공합니다:
//! - 환경변수 기반 설정 (`CollectorConfig`)
//! - 갱신 워크플로우 (`modules::run_update`)
//! - 실행 통계 (`FetchStats`)

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use stats::FetchStats;
