//! 수집 통계 구조체.

use std::time::Duration;

use feed_core::{InstrumentRegistry, Market, MarketScope, PriceRow};

/// 한 번의 수집 실행 통계
#[derive(Debug, Clone, Default)]
pub struct FetchStats {
    /// 범위 내 대상 종목 수
    pub total: usize,
    /// 종가를 얻은 종목 수
    pub success: usize,
    /// 재시도 후에도 조회하지 못한 종목 수
    pub unavailable: usize,
    /// 소요 시간
    pub elapsed: Duration,
}

impl FetchStats {
    /// 조립된 행과 레지스트리를 비교해 통계를 계산합니다.
    ///
    /// 조회 불가 종목은 행에서 아예 빠지므로, 범위 내 종목 중 자기
    /// 시장 뷰에 값이 있는 종목을 성공으로 셉니다.
    pub fn from_row(registry: &InstrumentRegistry, scope: MarketScope, row: &PriceRow) -> Self {
        let mut stats = Self::default();

        for instrument in registry.select(scope) {
            stats.total += 1;
            let fetched = match instrument.market {
                Market::Kr => matches!(row.kr.get(&instrument.id), Some(Some(_))),
                Market::Us => matches!(row.us.get(&instrument.id), Some(Some(_))),
            };
            if fetched {
                stats.success += 1;
            } else {
                stats.unavailable += 1;
            }
        }

        stats
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            unavailable = self.unavailable,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
