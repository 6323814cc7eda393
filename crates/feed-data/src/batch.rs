//! 범위 내 상품 일괄 조회와 하루치 행 조립.

use chrono::NaiveDate;
use std::time::Duration;
use tracing::debug;

use feed_core::{InstrumentRegistry, Market, MarketScope, PriceRow};

use crate::fetcher::{FetchOutcome, PriceFetcher};
use crate::provider::DailyCloseProvider;

/// 요청 범위에 해당하는 상품들을 순서대로 조회해 하루치 행을 만듭니다.
///
/// 조회는 레지스트리 선언 순서대로 직렬 실행되며, 성공/실패와 무관하게
/// 매 상품 조회 후 고정 지연을 둡니다. 외부 제공자에 대한 총 요청
/// 속도를 낮게 유지해 차단을 피하기 위한 것으로, 병렬화는 이 목적과
/// 상충하므로 의도적으로 하지 않습니다.
pub struct MarketBatchFetcher<P> {
    fetcher: PriceFetcher<P>,
    registry: InstrumentRegistry,
    request_delay: Duration,
}

impl<P: DailyCloseProvider> MarketBatchFetcher<P> {
    /// 새 일괄 조회기를 생성합니다.
    ///
    /// `request_delay`는 상품 간 지연과 재시도 간 지연에 공통으로
    /// 쓰입니다.
    pub fn new(
        provider: P,
        registry: InstrumentRegistry,
        retries: u32,
        request_delay: Duration,
    ) -> Self {
        Self {
            fetcher: PriceFetcher::new(provider, retries, request_delay),
            registry,
            request_delay,
        }
    }

    /// 주어진 날짜(실행일)의 행을 조립합니다.
    ///
    /// 한국 종목의 종가는 `kr`/`us` 양쪽에 기록하고, 미국 종목은
    /// `us`에만 기록하며 `kr`에는 명시적 null을 남깁니다. 조회에
    /// 실패한 종목은 행에서 생략합니다. 반올림은 여기서 한 번만
    /// 적용됩니다.
    pub async fn fetch_prices(&self, scope: MarketScope, today: NaiveDate) -> PriceRow {
        let mut row = PriceRow::empty(today);

        for instrument in self.registry.select(scope) {
            let outcome = self.fetcher.fetch_close(&instrument.symbol, today).await;

            // 성공/실패와 무관하게 다음 상품 전에 고정 지연 (rate limit)
            tokio::time::sleep(self.request_delay).await;

            let close = match outcome {
                FetchOutcome::Close(close) => instrument.market.round_close(close),
                FetchOutcome::Unavailable { .. } => continue,
            };

            debug!(id = %instrument.id, close = %close, "종가 수집");

            match instrument.market {
                Market::Kr => {
                    row.kr.insert(instrument.id.clone(), Some(close));
                    row.us.insert(instrument.id.clone(), Some(close));
                }
                Market::Us => {
                    row.us.insert(instrument.id.clone(), Some(close));
                    row.kr.insert(instrument.id.clone(), None);
                }
            }
        }

        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use crate::provider::DailyBar;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 심볼별 고정 응답을 돌려주고 호출 순서를 기록하는 provider.
    struct TableProvider {
        closes: HashMap<String, Decimal>,
        call_order: Mutex<Vec<String>>,
    }

    impl TableProvider {
        fn new(closes: &[(&str, Decimal)]) -> Self {
            Self {
                closes: closes
                    .iter()
                    .map(|(s, c)| (s.to_string(), *c))
                    .collect(),
                call_order: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl DailyCloseProvider for TableProvider {
        async fn daily_closes(
            &self,
            symbol: &str,
            _start: NaiveDate,
            end: NaiveDate,
        ) -> crate::Result<Vec<DailyBar>> {
            self.call_order.lock().unwrap().push(symbol.to_string());
            match self.closes.get(symbol) {
                Some(close) => Ok(vec![DailyBar {
                    date: end,
                    close: *close,
                }]),
                None => Err(DataError::Fetch(format!("no data for {}", symbol))),
            }
        }
    }

    fn batch(provider: TableProvider) -> MarketBatchFetcher<TableProvider> {
        MarketBatchFetcher::new(
            provider,
            InstrumentRegistry::default(),
            2,
            Duration::ZERO,
        )
    }

    fn today() -> NaiveDate {
        "2024-05-10".parse().unwrap()
    }

    #[tokio::test]
    async fn test_kr_close_mirrored_into_both_views() {
        let fetcher = batch(TableProvider::new(&[("069500.KS", dec!(67890.4))]));
        let row = fetcher.fetch_prices(MarketScope::Kr, today()).await;

        assert_eq!(row.kr["KODEX200"], Some(dec!(67890)));
        assert_eq!(row.us["KODEX200"], Some(dec!(67890)));
    }

    #[tokio::test]
    async fn test_us_close_leaves_explicit_null_in_kr_view() {
        let fetcher = batch(TableProvider::new(&[("TLT", dec!(98.765))]));
        let row = fetcher.fetch_prices(MarketScope::Us, today()).await;

        assert_eq!(row.us["TLT"], Some(dec!(98.77)));
        // 미국장 마감 전에는 알 수 없는 값: 누락이 아니라 명시적 null
        assert_eq!(row.kr["TLT"], None);
    }

    #[tokio::test]
    async fn test_unavailable_instrument_omitted_entirely() {
        // SPY는 실패, TLT만 성공
        let fetcher = batch(TableProvider::new(&[("TLT", dec!(98.765))]));
        let row = fetcher.fetch_prices(MarketScope::Us, today()).await;

        assert!(!row.kr.contains_key("SPY"));
        assert!(!row.us.contains_key("SPY"));
        assert!(row.us.contains_key("TLT"));
    }

    #[tokio::test]
    async fn test_fetch_order_follows_declaration_order() {
        let fetcher = batch(TableProvider::new(&[
            ("069500.KS", dec!(67890)),
            ("SPY", dec!(512.3)),
            ("TLT", dec!(98.77)),
        ]));
        fetcher.fetch_prices(MarketScope::Both, today()).await;

        let order = fetcher.fetcher.provider().call_order.lock().unwrap().clone();
        assert_eq!(order, vec!["069500.KS", "SPY", "TLT"]);
    }

    #[tokio::test]
    async fn test_scope_selects_subset() {
        let fetcher = batch(TableProvider::new(&[
            ("069500.KS", dec!(67890)),
            ("SPY", dec!(512.3)),
            ("TLT", dec!(98.77)),
        ]));
        let row = fetcher.fetch_prices(MarketScope::Kr, today()).await;

        // KR 범위에서는 미국 종목을 아예 조회하지 않음
        assert!(!row.us.contains_key("SPY"));
        assert!(!row.us.contains_key("TLT"));
        let order = fetcher.fetcher.provider().call_order.lock().unwrap().clone();
        assert_eq!(order, vec!["069500.KS"]);
    }

    #[tokio::test]
    async fn test_row_matches_end_to_end_scenario() {
        // KODEX200=67890.4, SPY 조회 불가, TLT=98.765
        let fetcher = batch(TableProvider::new(&[
            ("069500.KS", dec!(67890.4)),
            ("TLT", dec!(98.765)),
        ]));
        let row = fetcher.fetch_prices(MarketScope::Both, today()).await;

        assert_eq!(row.date, today());
        assert_eq!(row.kr.len(), 1);
        assert_eq!(row.kr["KODEX200"], Some(dec!(67890)));
        assert_eq!(row.us.len(), 2);
        assert_eq!(row.us["KODEX200"], Some(dec!(67890)));
        assert_eq!(row.us["TLT"], Some(dec!(98.77)));
    }
}
