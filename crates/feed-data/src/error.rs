//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 계층 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 외부 시세 조회 오류
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    Parse(String),

    /// 저장소 입출력 오류
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        DataError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
