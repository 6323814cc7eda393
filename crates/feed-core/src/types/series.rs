//! 가격 시계열과 메타데이터 타입.
//!
//! 시리즈는 날짜 오름차순, 날짜당 최대 한 행인 append-only 로그입니다.
//! 병합은 마지막 행만 검사하는 tail-only upsert로, "오늘 행을 확장하되
//! 과거는 건드리지 않는다"는 요구에 맞춘 설계입니다. 과거 날짜 갱신이
//! 필요해지면 날짜→위치 인덱스로 교체해야 합니다.

use crate::types::market::MarketScope;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `updatedAt` 타임스탬프 형식 (UTC).
const UPDATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// 하루치 종가 관측 행.
///
/// `kr`는 한국장 마감 시점, `us`는 미국장 마감 시점 기준의 뷰입니다.
/// 한국 종목의 종가는 확정 후 양쪽에 동일하게 기록되고, 미국 종목은
/// 미국장 마감 전에는 알 수 없으므로 `kr` 쪽에 명시적 `null`로 남습니다.
/// 조회에 실패한 종목은 `null`이 아니라 행에서 아예 빠집니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// 관측 날짜 (ISO-8601)
    pub date: NaiveDate,
    /// 한국장 마감 시점 뷰 (상품 id → 가격)
    #[serde(default)]
    pub kr: BTreeMap<String, Option<Decimal>>,
    /// 미국장 마감 시점 뷰 (상품 id → 가격)
    #[serde(default)]
    pub us: BTreeMap<String, Option<Decimal>>,
}

impl PriceRow {
    /// 주어진 날짜의 빈 행을 생성합니다.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            kr: BTreeMap::new(),
            us: BTreeMap::new(),
        }
    }

    /// 요청 범위 기준으로 이 행이 새 데이터를 담고 있는지 확인합니다.
    pub fn has_data_for(&self, scope: MarketScope) -> bool {
        match scope {
            MarketScope::Kr => !self.kr.is_empty(),
            MarketScope::Us => !self.us.is_empty(),
            MarketScope::Both => !self.kr.is_empty() || !self.us.is_empty(),
        }
    }
}

/// 시리즈에서 파생되는 메타데이터.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// 추적 상품 id 목록 (선언 순서)
    #[serde(default)]
    pub assets: Vec<String>,
    /// 첫 행의 날짜. 한 번 설정되면 덮어쓰지 않습니다.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// 마지막 행의 날짜. 저장할 때마다 갱신됩니다.
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

/// `prices.json` 전체 구조.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    /// 날짜 오름차순 행 목록
    pub series: Vec<PriceRow>,
    /// 파생 메타데이터
    #[serde(default)]
    pub meta: SeriesMeta,
}

impl PriceHistory {
    /// 하루치 행을 멱등적으로 병합합니다.
    ///
    /// 마지막 행과 날짜가 같으면 `kr`/`us` 맵을 필드 단위로 덮어쓰고
    /// (새 행에 있는 키만 교체), 다르면 새 행으로 덧붙입니다.
    /// 전제: `row.date`는 마지막 행의 날짜보다 같거나 큽니다.
    pub fn merge_row(&mut self, row: PriceRow) {
        match self.series.last_mut() {
            Some(last) if last.date == row.date => {
                last.kr.extend(row.kr);
                last.us.extend(row.us);
            }
            _ => self.series.push(row),
        }
    }

    /// 시리즈로부터 메타데이터를 재계산합니다.
    ///
    /// `assets`는 비어 있을 때만 기본 목록으로 채우고, `start`는 최초
    /// 한 번만 설정하며, `end`는 항상 마지막 행의 날짜로 갱신합니다.
    pub fn recompute_meta(&mut self, default_assets: &[String]) {
        if self.meta.assets.is_empty() {
            self.meta.assets = default_assets.to_vec();
        }
        if self.meta.start.is_none() {
            self.meta.start = self.series.first().map(|row| row.date);
        }
        self.meta.end = self.series.last().map(|row| row.date);
    }
}

/// `meta.json` 구조.
///
/// 시리즈 파일과 별도로 유지되는 작은 레코드로, 소비자(대시보드)가
/// 시리즈 전체를 읽지 않고도 신선도를 확인할 수 있게 합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeta {
    /// 추적 상품 id 목록
    #[serde(default)]
    pub assets: Vec<String>,
    /// 마지막 성공 기록 시각 (UTC, `%Y-%m-%dT%H:%M:%SZ`)
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UpdateMeta {
    /// 주어진 상품 목록에 대한 기본 메타데이터를 생성합니다.
    pub fn for_assets(assets: Vec<String>) -> Self {
        Self {
            assets,
            updated_at: None,
        }
    }

    /// 현재 UTC 시각으로 갱신 시각을 기록합니다.
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now().format(UPDATED_AT_FORMAT).to_string());
    }
}
