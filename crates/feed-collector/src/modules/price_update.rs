//! 가격 데이터 갱신 워크플로우.
//!
//! 한 번의 실행은 로드 → 조회 → (병합 → 저장 | no-op) 순서의 단일
//! 패스입니다. 종목 단위 조회 실패는 부분 행으로 degrade하며 치명적이지
//! 않습니다. 요청 범위에 새 데이터가 전혀 없으면 저장 파일을 건드리지
//! 않고 종료합니다.

use chrono::{Local, NaiveDate};
use std::time::Instant;
use tracing::info;

use feed_core::{InstrumentRegistry, MarketScope};
use feed_data::{DailyCloseProvider, MarketBatchFetcher, SeriesStore};

use crate::{CollectorConfig, FetchStats, Result};

/// 한 번의 갱신 실행 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// 시리즈가 갱신되어 저장됨
    Updated {
        /// 저장 후 행 수
        rows: usize,
        /// 시리즈 마지막 날짜
        end: NaiveDate,
    },
    /// 요청 범위에 새 데이터 없음; 저장 파일 유지
    NoNewData,
}

/// 가격 데이터 갱신을 실행합니다.
pub async fn run_update<P: DailyCloseProvider>(
    config: &CollectorConfig,
    registry: &InstrumentRegistry,
    provider: P,
    scope: MarketScope,
) -> Result<UpdateOutcome> {
    let start = Instant::now();
    let ids = registry.ids();

    let store = SeriesStore::new(&config.data_dir);
    let mut history = store.load(&ids)?;

    let today = Local::now().date_naive();
    info!(scope = %scope, date = %today, rows = history.series.len(), "가격 수집 시작");

    let batch = MarketBatchFetcher::new(
        provider,
        registry.clone(),
        config.fetch.retries,
        config.fetch.request_delay(),
    );
    let row = batch.fetch_prices(scope, today).await;

    let mut stats = FetchStats::from_row(registry, scope, &row);
    stats.elapsed = start.elapsed();
    stats.log_summary("가격 수집");

    if !row.has_data_for(scope) {
        info!(scope = %scope, "요청 범위에 새 데이터 없음; 저장 파일 유지");
        return Ok(UpdateOutcome::NoNewData);
    }

    history.merge_row(row);
    history.recompute_meta(&ids);
    store.persist(&history)?;

    // 시리즈와 별도로 유지되는 신선도 레코드 갱신
    let mut meta = store.load_update_meta(&ids)?;
    meta.touch();
    store.persist_update_meta(&meta)?;

    let rows = history.series.len();
    let end = history.meta.end.unwrap_or(today);
    info!(rows = rows, end = %end, "가격 데이터 갱신 완료");

    Ok(UpdateOutcome::Updated { rows, end })
}
