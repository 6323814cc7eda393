//! 환경변수 기반 설정 모듈.

use std::path::PathBuf;
use std::time::Duration;

use feed_core::MarketScope;

use crate::Result;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터 파일 디렉터리
    pub data_dir: PathBuf,
    /// 시세 조회 설정
    pub fetch: FetchConfig,
    /// `MARKET` 환경변수의 수집 범위 (CLI 인자가 없을 때 사용)
    pub market: Option<String>,
}

/// 시세 조회 설정
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// 종목당 총 시도 횟수
    pub retries: u32,
    /// 요청 간 고정 지연 (밀리초). 과도한 요청으로 인한 차단 방지용
    pub request_delay_ms: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            fetch: FetchConfig {
                retries: env_var_parse("FEED_FETCH_RETRIES", 2),
                request_delay_ms: env_var_parse("FEED_REQUEST_DELAY_MS", 2000),
            },
            market: std::env::var("MARKET").ok(),
        })
    }

    /// CLI 인자와 환경변수에서 수집 범위를 결정합니다.
    ///
    /// 우선순위: CLI 인자 → `MARKET` 환경변수 → 기본값(`both`).
    /// 대소문자는 구분하지 않습니다.
    pub fn resolve_scope(&self, cli_market: Option<&str>) -> Result<MarketScope> {
        match cli_market.or(self.market.as_deref()) {
            Some(raw) => raw
                .parse()
                .map_err(crate::error::CollectorError::Config),
            None => Ok(MarketScope::default()),
        }
    }
}

impl FetchConfig {
    /// 요청 간 지연을 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
