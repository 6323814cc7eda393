//! 가격 시계열 플랫 파일 저장소.
//!
//! `prices.json`은 `{series, meta}` 래퍼 구조가 현재 형식이고,
//! 행 배열만 저장하던 구버전 파일도 읽을 수 있습니다. 쓰기는 전체
//! 파일 덮어쓰기이며 부분 패치는 없습니다.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use feed_core::{PriceHistory, PriceRow, SeriesMeta, UpdateMeta};

use crate::error::{DataError, Result};

/// 시리즈 파일 이름.
pub const PRICES_FILE: &str = "prices.json";
/// 갱신 메타 파일 이름.
pub const META_FILE: &str = "meta.json";

/// 저장 형식 버전.
///
/// `V0`은 메타 없이 행 배열만 저장하던 구버전 형식입니다. 새 버전이
/// 추가되면 여기에 variant를 더해 호환 분기를 한곳에 모읍니다.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    /// 현재 형식: `{series, meta}`
    V1(PriceHistory),
    /// 구버전: 행 배열만
    V0(Vec<PriceRow>),
}

/// `prices.json`/`meta.json`을 관리하는 저장소.
pub struct SeriesStore {
    data_dir: PathBuf,
}

impl SeriesStore {
    /// 데이터 디렉터리를 지정해 저장소를 생성합니다.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// 시리즈 파일 경로.
    pub fn prices_path(&self) -> PathBuf {
        self.data_dir.join(PRICES_FILE)
    }

    /// 갱신 메타 파일 경로.
    pub fn meta_path(&self) -> PathBuf {
        self.data_dir.join(META_FILE)
    }

    /// 저장된 시리즈를 로드합니다.
    ///
    /// 파일이 없으면 빈 시리즈와 기본 메타데이터를 반환합니다.
    /// 파일이 있지만 파싱할 수 없으면 오류를 반환합니다. 손상된
    /// 파일을 빈 시리즈로 취급하면 다음 저장에서 기존 이력 전체를
    /// 덮어쓰게 되므로, 실행을 실패시켜 스케줄러에 드러냅니다.
    pub fn load(&self, default_assets: &[String]) -> Result<PriceHistory> {
        let path = self.prices_path();
        if !path.exists() {
            debug!(path = %path.display(), "시리즈 파일 없음; 빈 시리즈로 시작");
            return Ok(PriceHistory {
                series: Vec::new(),
                meta: SeriesMeta {
                    assets: default_assets.to_vec(),
                    start: None,
                    end: None,
                },
            });
        }

        let raw = fs::read_to_string(&path)?;
        match serde_json::from_str::<StoredHistory>(&raw)? {
            StoredHistory::V1(history) => Ok(history),
            StoredHistory::V0(series) => {
                debug!("구버전(배열) 형식 감지; 빈 메타로 래핑");
                Ok(PriceHistory {
                    series,
                    meta: SeriesMeta::default(),
                })
            }
        }
    }

    /// 시리즈 전체를 저장합니다 (전체 파일 덮어쓰기).
    pub fn persist(&self, history: &PriceHistory) -> Result<()> {
        write_json(&self.data_dir, &self.prices_path(), history)
    }

    /// 갱신 메타를 로드합니다. 파일이 없으면 기본값을 반환합니다.
    pub fn load_update_meta(&self, default_assets: &[String]) -> Result<UpdateMeta> {
        let path = self.meta_path();
        if !path.exists() {
            return Ok(UpdateMeta::for_assets(default_assets.to_vec()));
        }

        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// 갱신 메타를 저장합니다.
    pub fn persist_update_meta(&self, meta: &UpdateMeta) -> Result<()> {
        write_json(&self.data_dir, &self.meta_path(), meta)
    }
}

/// 사람이 읽을 수 있는 UTF-8 JSON으로 저장합니다. 비ASCII 문자는
/// 이스케이프하지 않습니다.
fn write_json<T: serde::Serialize>(dir: &Path, path: &Path, value: &T) -> Result<()> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(value).map_err(DataError::Serialization)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn assets() -> Vec<String> {
        vec![
            "KODEX200".to_string(),
            "SPY".to_string(),
            "TLT".to_string(),
        ]
    }

    fn sample_history() -> PriceHistory {
        let mut row = PriceRow::empty("2024-05-10".parse().unwrap());
        row.kr.insert("KODEX200".to_string(), Some(dec!(67890)));
        row.us.insert("KODEX200".to_string(), Some(dec!(67890)));
        row.us.insert("TLT".to_string(), Some(dec!(98.77)));
        row.kr.insert("TLT".to_string(), None);

        let mut history = PriceHistory::default();
        history.merge_row(row);
        history.recompute_meta(&assets());
        history
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());

        let history = store.load(&assets()).unwrap();
        assert!(history.series.is_empty());
        assert_eq!(history.meta.assets, assets());
        assert_eq!(history.meta.start, None);
        assert_eq!(history.meta.end, None);
    }

    #[test]
    fn test_persist_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());

        let history = sample_history();
        store.persist(&history).unwrap();

        let loaded = store.load(&assets()).unwrap();
        assert_eq!(loaded, history);
    }

    #[test]
    fn test_kr_price_persists_as_integer() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());
        store.persist(&sample_history()).unwrap();

        let raw = fs::read_to_string(store.prices_path()).unwrap();
        // 원화 가격은 정수로, 달러 가격은 소수 둘째 자리까지
        assert!(raw.contains("\"KODEX200\": 67890"), "raw: {}", raw);
        assert!(raw.contains("\"TLT\": 98.77"), "raw: {}", raw);
        assert!(raw.contains("\"TLT\": null"), "raw: {}", raw);
    }

    #[test]
    fn test_load_bare_array_compat() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());

        let bare = r#"[{"date":"2024-05-09","kr":{"KODEX200":67500},"us":{"KODEX200":67500}}]"#;
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(store.prices_path(), bare).unwrap();

        let history = store.load(&assets()).unwrap();
        assert_eq!(history.series.len(), 1);
        assert_eq!(history.series[0].kr["KODEX200"], Some(dec!(67500)));
        // 구버전 파일에는 메타가 없으므로 빈 메타로 재구성
        assert_eq!(history.meta, SeriesMeta::default());
    }

    #[test]
    fn test_load_corrupt_file_fails_run() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());

        fs::write(store.prices_path(), "{\"series\": [tru").unwrap();

        let err = store.load(&assets()).unwrap_err();
        assert!(matches!(err, DataError::Serialization(_)));
    }

    #[test]
    fn test_update_meta_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = SeriesStore::new(dir.path());

        let loaded = store.load_update_meta(&assets()).unwrap();
        assert_eq!(loaded.assets, assets());
        assert!(loaded.updated_at.is_none());

        let mut meta = loaded;
        meta.touch();
        store.persist_update_meta(&meta).unwrap();

        let raw = fs::read_to_string(store.meta_path()).unwrap();
        assert!(raw.contains("\"updatedAt\""), "raw: {}", raw);

        let reloaded = store.load_update_meta(&assets()).unwrap();
        assert_eq!(reloaded, meta);
    }
}
