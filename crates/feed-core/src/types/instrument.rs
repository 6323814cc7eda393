//! 수집 대상 상품 정의.
//!
//! 상품 id는 저장 파일의 키로 쓰이므로 실행 간에 안정적이어야 합니다.
//! id를 바꾸면 기존 시계열과의 연속성이 깨집니다.

use crate::types::market::{Market, MarketScope};

/// 추적 대상 상품 하나.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    /// 안정적인 식별자. 저장 파일의 키가 됩니다.
    pub id: String,
    /// 상장 시장
    pub market: Market,
    /// 외부 시세 제공자 조회용 심볼.
    /// 한국 종목은 거래소 접미사 포함 (예: "069500.KS"), 미국은 티커만.
    pub symbol: String,
}

impl Instrument {
    /// 새 상품을 생성합니다.
    pub fn new(id: impl Into<String>, market: Market, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            market,
            symbol: symbol.into(),
        }
    }
}

/// 불변 상품 레지스트리.
///
/// 컴파일 타임에 고정된 목록을 기본값으로 제공하며, 전역 상수 대신
/// 각 컴포넌트에 값으로 주입해 테스트에서 교체할 수 있게 합니다.
#[derive(Debug, Clone)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    /// 레지스트리를 생성합니다. id가 중복되면 `None`.
    pub fn new(instruments: Vec<Instrument>) -> Option<Self> {
        for (i, inst) in instruments.iter().enumerate() {
            if instruments[..i].iter().any(|other| other.id == inst.id) {
                return None;
            }
        }
        Some(Self { instruments })
    }

    /// 선언 순서대로 전체 상품을 반환합니다.
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// 전체 상품 id 목록 (선언 순서).
    pub fn ids(&self) -> Vec<String> {
        self.instruments.iter().map(|a| a.id.clone()).collect()
    }

    /// 범위에 해당하는 상품만 선언 순서대로 반환합니다.
    pub fn select(&self, scope: MarketScope) -> Vec<&Instrument> {
        self.instruments
            .iter()
            .filter(|a| scope.includes(a.market))
            .collect()
    }
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        // 한국 종목은 거래소 접미사 포함 심볼, 미국은 티커 직접 조회
        Self {
            instruments: vec![
                Instrument::new("KODEX200", Market::Kr, "069500.KS"),
                Instrument::new("SPY", Market::Us, "SPY"),
                Instrument::new("TLT", Market::Us, "TLT"),
            ],
        }
    }
}
