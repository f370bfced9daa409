//! Advisory 데이터베이스 — 로컬 JSON 피드 로딩 및 조회
//!
//! [`AdvisoryDb`]는 로컬 파일시스템의 JSON 파일에서 취약점 advisory를
//! 로드합니다. 피드의 수집/동기화 방식은 이 코어의 범위 밖입니다 —
//! 디렉토리에 이미 존재하는 파일만 읽습니다.
//!
//! # DB 디렉토리 구조
//!
//! ```text
//! /var/lib/hullscan/advisory-db/
//!   alpine.json    # Alpine secdb advisory
//!   debian.json    # Debian security tracker advisory
//!   ubuntu.json    # Ubuntu CVE tracker advisory
//!   redhat.json    # RedHat/CentOS advisory
//!   cargo.json     # crates.io 생태계 advisory
//!   npm.json       # npm 생태계 advisory
//! ```
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "id": "CVE-2019-1549",
//!     "feed": "alpine",
//!     "package": "openssl",
//!     "release": "3.10",
//!     "affected": [{ "introduced": null, "fixed": "1.1.1d-r0" }],
//!     "fixed_version": "1.1.1d-r0",
//!     "severity": "MEDIUM",
//!     "title": "openssl: information disclosure in fork()",
//!     "description": "OpenSSL 1.1.1 introduced a rewritten random number generator..."
//!   }
//! ]
//! ```
//!
//! `severity`는 피드가 준 원시 문자열 그대로 보존되며, 탐지 시점에
//! 정규 레벨로 분류됩니다.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use hullscan_core::error::ScanError;

/// advisory 피드 파일 최대 크기 (50 MB)
const MAX_FEED_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 취약점 advisory 엔트리
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    /// 취약점 식별자 (예: CVE-2019-1549)
    pub id: String,
    /// 소속 피드 이름 (배포판 또는 생태계)
    pub feed: String,
    /// 영향받는 패키지명
    pub package: String,
    /// 배포판 릴리스 스트림 (예: "3.10", "9"); None이면 모든 릴리스에 적용
    #[serde(default)]
    pub release: Option<String>,
    /// 영향받는 버전 범위
    #[serde(default)]
    pub affected: Vec<VersionRange>,
    /// 수정된 버전 (None이면 미수정)
    #[serde(default)]
    pub fixed_version: Option<String>,
    /// 피드가 제공한 원시 심각도 문자열
    #[serde(default)]
    pub severity: String,
    /// 취약점 제목
    #[serde(default)]
    pub title: String,
    /// 상세 설명
    #[serde(default)]
    pub description: String,
}

/// 영향받는 버전 범위
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRange {
    /// 도입 버전 (이 버전부터 영향, None이면 시작 제한 없음)
    pub introduced: Option<String>,
    /// 수정 버전 (이 버전에서 수정됨, None이면 미수정)
    pub fixed: Option<String>,
}

/// Advisory 데이터베이스
///
/// 로드 후 불변이며 `Arc`로 공유됩니다.
///
/// # 인덱싱
///
/// O(1) 조회를 위해 `(feed, package)` 쌍으로 인덱싱됩니다.
#[derive(Debug)]
pub struct AdvisoryDb {
    entries: Vec<Advisory>,
    index: HashMap<(String, String), Vec<usize>>,
}

impl AdvisoryDb {
    /// 빈 데이터베이스를 생성합니다.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn build_index(entries: &[Advisory]) -> HashMap<(String, String), Vec<usize>> {
        let mut index: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            let key = (entry.feed.clone(), entry.package.clone());
            index.entry(key).or_default().push(idx);
        }
        index
    }

    /// 엔트리 목록으로 데이터베이스를 생성합니다 (테스트용).
    pub fn from_entries(entries: Vec<Advisory>) -> Self {
        let index = Self::build_index(&entries);
        Self { entries, index }
    }

    /// JSON 문자열에서 데이터베이스를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        let entries: Vec<Advisory> =
            serde_json::from_str(json).map_err(|e| ScanError::AdvisoryDb {
                reason: format!("failed to parse advisory JSON: {e}"),
            })?;
        Ok(Self::from_entries(entries))
    }

    /// 디렉토리의 모든 `*.json` 피드 파일을 로드합니다.
    ///
    /// 디렉토리가 없으면 빈 데이터베이스를 반환합니다 (에러 아님).
    /// 존재하는 파일이 파싱되지 않으면 에러입니다.
    pub fn load_from_dir(dir: &Path) -> Result<Self, ScanError> {
        if !dir.exists() {
            warn!(dir = %dir.display(), "advisory db directory not found, using empty db");
            return Ok(Self::empty());
        }

        let mut entries = Vec::new();
        let dir_entries = std::fs::read_dir(dir).map_err(|e| ScanError::AdvisoryDb {
            reason: format!("{}: {e}", dir.display()),
        })?;

        for dir_entry in dir_entries {
            let dir_entry = dir_entry.map_err(|e| ScanError::AdvisoryDb {
                reason: format!("{}: {e}", dir.display()),
            })?;
            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let metadata = std::fs::metadata(&path).map_err(|e| ScanError::AdvisoryDb {
                reason: format!("{}: {e}", path.display()),
            })?;
            if metadata.len() > MAX_FEED_FILE_SIZE {
                return Err(ScanError::AdvisoryDb {
                    reason: format!(
                        "{}: feed file too large ({} bytes, max {})",
                        path.display(),
                        metadata.len(),
                        MAX_FEED_FILE_SIZE
                    ),
                });
            }

            let content = std::fs::read_to_string(&path).map_err(|e| ScanError::AdvisoryDb {
                reason: format!("{}: {e}", path.display()),
            })?;
            let feed_entries: Vec<Advisory> =
                serde_json::from_str(&content).map_err(|e| ScanError::AdvisoryDb {
                    reason: format!("{}: {e}", path.display()),
                })?;
            debug!(feed = %path.display(), entries = feed_entries.len(), "advisory feed loaded");
            entries.extend(feed_entries);
        }

        Ok(Self::from_entries(entries))
    }

    /// 피드와 패키지 이름으로 advisory를 조회합니다.
    pub fn lookup(&self, feed: &str, package: &str) -> Vec<&Advisory> {
        self.index
            .get(&(feed.to_owned(), package.to_owned()))
            .map(|indices| indices.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    /// 전체 엔트리 수를 반환합니다.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 전체 엔트리를 반환합니다.
    pub fn entries(&self) -> &[Advisory] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn advisory(feed: &str, package: &str, id: &str) -> Advisory {
        Advisory {
            id: id.to_owned(),
            feed: feed.to_owned(),
            package: package.to_owned(),
            release: None,
            affected: vec![],
            fixed_version: None,
            severity: "HIGH".to_owned(),
            title: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn empty_db_has_no_entries() {
        let db = AdvisoryDb::empty();
        assert_eq!(db.entry_count(), 0);
        assert!(db.lookup("alpine", "openssl").is_empty());
    }

    #[test]
    fn lookup_is_keyed_by_feed_and_package() {
        let db = AdvisoryDb::from_entries(vec![
            advisory("alpine", "openssl", "CVE-1"),
            advisory("debian", "openssl", "CVE-2"),
            advisory("alpine", "musl", "CVE-3"),
        ]);

        let hits = db.lookup("alpine", "openssl");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "CVE-1");
        assert!(db.lookup("npm", "openssl").is_empty());
    }

    #[test]
    fn from_json_parses_entries() {
        let json = r#"[
            {
                "id": "CVE-2019-1549",
                "feed": "alpine",
                "package": "openssl",
                "release": "3.10",
                "affected": [{ "introduced": null, "fixed": "1.1.1d-r0" }],
                "fixed_version": "1.1.1d-r0",
                "severity": "MEDIUM",
                "title": "openssl: information disclosure in fork()",
                "description": "random number generator state reuse"
            }
        ]"#;
        let db = AdvisoryDb::from_json(json).unwrap();
        assert_eq!(db.entry_count(), 1);
        let hits = db.lookup("alpine", "openssl");
        assert_eq!(hits[0].release.as_deref(), Some("3.10"));
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = AdvisoryDb::from_json("{not json").unwrap_err();
        assert!(matches!(err, ScanError::AdvisoryDb { .. }));
    }

    #[test]
    fn load_from_missing_dir_is_empty() {
        let db = AdvisoryDb::load_from_dir(Path::new("/nonexistent/advisory-db")).unwrap();
        assert_eq!(db.entry_count(), 0);
    }

    #[test]
    fn load_from_dir_reads_all_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut alpine = std::fs::File::create(dir.path().join("alpine.json")).unwrap();
        alpine
            .write_all(br#"[{"id":"CVE-1","feed":"alpine","package":"openssl"}]"#)
            .unwrap();
        let mut npm = std::fs::File::create(dir.path().join("npm.json")).unwrap();
        npm.write_all(br#"[{"id":"CVE-2","feed":"npm","package":"lodash"}]"#)
            .unwrap();
        // json이 아닌 파일은 무시
        std::fs::File::create(dir.path().join("README.md")).unwrap();

        let db = AdvisoryDb::load_from_dir(dir.path()).unwrap();
        assert_eq!(db.entry_count(), 2);
        assert_eq!(db.lookup("npm", "lodash").len(), 1);
    }

    #[test]
    fn load_from_dir_rejects_broken_feed() {
        let dir = tempfile::tempdir().unwrap();
        let mut feed = std::fs::File::create(dir.path().join("alpine.json")).unwrap();
        feed.write_all(b"[{broken").unwrap();

        let err = AdvisoryDb::load_from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ScanError::AdvisoryDb { .. }));
    }
}
