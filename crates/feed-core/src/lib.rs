//! 가격 피드 시스템의 공용 도메인 타입.
//!
//! 이 crate는 수집기와 데이터 계층이 함께 쓰는 타입을 제공합니다:
//! - 시장/수집 범위 (`Market`, `MarketScope`)
//! - 수집 대상 상품 레지스트리 (`Instrument`, `InstrumentRegistry`)
//! - 가격 시계열과 메타데이터 (`PriceRow`, `PriceHistory`, `UpdateMeta`)

pub mod logging;
pub mod types;

pub use types::instrument::{Instrument, InstrumentRegistry};
pub use types::market::{Market, MarketScope};
pub use types::series::{PriceHistory, PriceRow, SeriesMeta, UpdateMeta};
