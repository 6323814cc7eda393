//! 재시도와 지연이 적용된 단일 종목 종가 조회.

use chrono::{Duration as ChronoDuration, NaiveDate};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::warn;

use crate::provider::DailyCloseProvider;

/// 휴장일/연휴를 견디기 위한 조회 구간 (달력일 기준).
///
/// 2주면 긴 연휴를 끼고도 최소 하루의 거래일이 보장됩니다.
const LOOKBACK_DAYS: i64 = 14;

/// 단일 종목 조회 결과.
///
/// "조회 불가"를 정당한 null 가격과 혼동하지 않도록 별도 variant로
/// 표현합니다. 조회 불가 종목은 그날 행에서 아예 빠집니다.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// 최신 종가
    Close(Decimal),
    /// 재시도 소진 후에도 조회 실패
    Unavailable {
        /// 마지막 실패 사유
        reason: String,
    },
}

/// 제한된 재시도와 고정 지연을 적용한 종가 조회기.
pub struct PriceFetcher<P> {
    provider: P,
    /// 총 시도 횟수 (기본 2)
    retries: u32,
    /// 실패한 시도와 다음 시도 사이의 고정 지연
    request_delay: Duration,
}

impl<P: DailyCloseProvider> PriceFetcher<P> {
    /// 새 조회기를 생성합니다.
    pub fn new(provider: P, retries: u32, request_delay: Duration) -> Self {
        Self {
            provider,
            retries: retries.max(1),
            request_delay,
        }
    }

    /// 내부 provider 참조를 반환합니다.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// 기준일로 끝나는 최근 2주 구간을 조회해 마지막 행의 종가를
    /// 반환합니다.
    ///
    /// 빈 결과와 provider 오류는 동일하게 실패한 시도로 취급해
    /// 재시도합니다. 모든 시도가 실패하면 경고를 남기고
    /// `Unavailable`을 반환하며, 오류를 전파하지 않습니다.
    pub async fn fetch_close(&self, symbol: &str, today: NaiveDate) -> FetchOutcome {
        let start = today - ChronoDuration::days(LOOKBACK_DAYS);
        let mut reason = String::new();

        for attempt in 1..=self.retries {
            match self.provider.daily_closes(symbol, start, today).await {
                Ok(bars) => match bars.last() {
                    Some(bar) => return FetchOutcome::Close(bar.close),
                    None => reason = "빈 조회 결과".to_string(),
                },
                Err(e) => reason = e.to_string(),
            }

            if attempt < self.retries {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        warn!(symbol = symbol, reason = %reason, "종가 조회 실패");
        FetchOutcome::Unavailable { reason }
    }
}
