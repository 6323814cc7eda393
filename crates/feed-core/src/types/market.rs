//! 시장 및 수집 범위 타입.
//!
//! - `Market` - 상품이 상장된 시장 (한국/미국)
//! - `MarketScope` - 한 번의 실행이 수집할 범위 (한국장/미국장/전체)

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 상품이 상장된 시장.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Market {
    /// 한국 시장 (KRX)
    Kr,
    /// 미국 시장 (NYSE/NASDAQ/AMEX)
    Us,
}

impl Market {
    /// 시장 관례에 맞춰 종가를 반올림합니다.
    ///
    /// 원화 표시 가격은 정수 단위, 달러 표시 가격은 센트 단위가 관례입니다.
    /// 반올림은 수집 시점에 한 번만 적용되며 병합 시 재적용되지 않습니다.
    pub fn round_close(&self, value: Decimal) -> Decimal {
        match self {
            Market::Kr => value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            Market::Us => value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Market::Kr => write!(f, "KR"),
            Market::Us => write!(f, "US"),
        }
    }
}

/// 한 번의 실행이 수집할 시장 범위.
///
/// 장 마감 시각이 다르므로 스케줄러가 실행마다 범위를 지정합니다.
/// 미지정 시 기본값은 `Both`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketScope {
    /// 한국장만
    Kr,
    /// 미국장만
    Us,
    /// 전체
    #[default]
    Both,
}

impl MarketScope {
    /// 주어진 시장이 이 범위에 포함되는지 확인합니다.
    pub fn includes(&self, market: Market) -> bool {
        match self {
            MarketScope::Kr => market == Market::Kr,
            MarketScope::Us => market == Market::Us,
            MarketScope::Both => true,
        }
    }
}

impl FromStr for MarketScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kr" => Ok(Self::Kr),
            "us" => Ok(Self::Us),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown market scope: {}", s)),
        }
    }
}

impl fmt::Display for MarketScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketScope::Kr => write!(f, "KR"),
            MarketScope::Us => write!(f, "US"),
            MarketScope::Both => write!(f, "both"),
        }
    }
}
