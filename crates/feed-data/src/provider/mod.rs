//! 시세 Provider 모듈.
//!
//! "심볼과 기간을 주면 일별 종가 테이블을 돌려주는" 외부 능력을
//! trait으로 추상화합니다. 운영에서는 Yahoo Finance chart API를 쓰고,
//! 테스트에서는 스크립트된 구현으로 교체합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::Result;

pub mod yahoo;

pub use yahoo::YahooChartClient;

/// 하루치 종가.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    /// 거래일
    pub date: NaiveDate,
    /// 종가
    pub close: Decimal,
}

/// 일별 종가 제공 능력.
#[async_trait]
pub trait DailyCloseProvider: Send + Sync {
    /// 주어진 기간의 일별 종가를 날짜 오름차순으로 반환합니다.
    ///
    /// 휴장일만 포함된 기간이면 빈 목록을 반환할 수 있습니다.
    async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>>;
}
