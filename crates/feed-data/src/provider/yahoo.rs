//! Yahoo Finance chart API 클라이언트.
//!
//! v8 chart API로 일별 종가를 조회합니다. 한국 종목은 거래소 접미사가
//! 붙은 심볼(예: "069500.KS"), 미국 종목은 티커를 그대로 사용합니다.
//! 인증이 필요 없는 공개 엔드포인트라 네트워크 수준 타임아웃과
//! User-Agent만 설정합니다.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::{DailyBar, DailyCloseProvider};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance chart API v8 응답 구조.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<ChartAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ChartAdjClose {
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance chart API 클라이언트.
#[derive(Clone)]
pub struct YahooChartClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooChartClient {
    /// 기본 엔드포인트로 클라이언트를 생성합니다.
    ///
    /// 클라이언트 생성 실패는 시세 조회 능력 자체가 없는 상태이므로
    /// 호출자는 작업 시작 전에 실패를 치명적으로 처리해야 합니다.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// 지정한 엔드포인트로 클라이언트를 생성합니다 (테스트용).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::Config(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl DailyCloseProvider for YahooChartClient {
    async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        // 날짜를 UNIX 타임스탬프 구간으로 변환 (end는 당일 끝까지)
        let start_ts = Utc
            .from_utc_datetime(&start.and_time(NaiveTime::MIN))
            .timestamp();
        let end_ts = Utc
            .from_utc_datetime(&(end + ChronoDuration::days(1)).and_time(NaiveTime::MIN))
            .timestamp()
            - 1;

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, start_ts, end_ts
        );

        debug!(symbol = symbol, url = %url, "Yahoo chart 요청");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Fetch(format!(
                "Yahoo chart API 오류 [{}]: {} - {}",
                symbol, status, body
            )));
        }

        let chart: ChartResponse = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("Yahoo 응답 파싱 실패: {}", e)))?;

        if let Some(error) = chart.chart.error {
            return Err(DataError::Fetch(format!(
                "Yahoo chart 에러: {} - {}",
                error.code, error.description
            )));
        }

        let result = chart
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| DataError::Parse("응답에 result가 없음".to_string()))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|q| q.close)
            .unwrap_or_default();

        // 명시적 종가 컬럼이 비어 있으면 마지막 필드(조정 종가)로 폴백
        let adj_closes = result
            .indicators
            .adj_close
            .and_then(|ac| ac.into_iter().next())
            .and_then(|ac| ac.adj_close)
            .unwrap_or_default();

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, ts) in timestamps.iter().enumerate() {
            let close = closes
                .get(i)
                .and_then(|v| *v)
                .or_else(|| adj_closes.get(i).and_then(|v| *v));

            let Some(close) = close else { continue };

            let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };

            // 십진 문자열 경유로 변환해 이진 부동소수점 잔여 자릿수를 제거
            let close = Decimal::from_str(&format!("{:.4}", close))
                .map_err(|e| DataError::Parse(format!("종가 변환 실패 ({}): {}", close, e)))?;

            bars.push(DailyBar { date, close });
        }

        bars.sort_by_key(|bar| bar.date);

        Ok(bars)
    }
}
