//! tracing을 사용한 로깅 초기화.
//!
//! 수집기는 스케줄러(GitHub Actions) 로그로 바로 출력되므로 두 가지
//! 형식만 지원합니다:
//! - **pretty**: 사람이 읽기 쉬운 형식 (기본)
//! - **json**: 로그 집계용 JSON 형식

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 사람이 읽기 쉬운 형식
    #[default]
    Pretty,
    /// 로그 집계용 JSON 형식
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 로그 레벨 필터 (예: "info", "debug", "feed_collector=debug")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
}

impl LogConfig {
    /// 주어진 레벨로 설정을 생성합니다. 형식은 `LOG_FORMAT` 환경변수를
    /// 따르고, 없으면 pretty입니다.
    pub fn new(level: impl Into<String>) -> Self {
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            level: level.into(),
            format,
        }
    }
}

/// 로깅 시스템을 초기화합니다.
///
/// `RUST_LOG` 환경변수가 있으면 설정의 레벨보다 우선합니다.
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    match config.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer())
                .try_init()?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()?;
        }
    }

    Ok(())
}
