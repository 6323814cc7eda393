//! 시세 수집과 플랫 파일 저장을 담당하는 데이터 계층.
//!
//! - `provider` - 외부 시세 제공자 (Yahoo Finance chart API)
//! - `fetcher` - 재시도/지연이 적용된 단일 종목 종가 조회
//! - `batch` - 범위 내 상품 일괄 조회 및 하루치 행 조립
//! - `store` - `prices.json`/`meta.json` 로드와 저장

pub mod batch;
pub mod error;
pub mod fetcher;
pub mod provider;
pub mod store;

pub use batch::MarketBatchFetcher;
pub use error::{DataError, Result};
pub use fetcher::{FetchOutcome, PriceFetcher};
pub use provider::{DailyBar, DailyCloseProvider, YahooChartClient};
pub use store::SeriesStore;
