//! apk 설치 DB 파서
//!
//! Alpine의 `lib/apk/db/installed`는 빈 줄로 구분된 레코드이며,
//! 각 레코드의 `P:` 줄이 패키지명, `V:` 줄이 버전입니다.

use hullscan_core::error::AnalyzeError;
use hullscan_core::types::Package;

use super::PackageAnalyzer;

/// apk 설치 DB 분석기
pub struct ApkAnalyzer;

impl PackageAnalyzer for ApkAnalyzer {
    fn name(&self) -> &'static str {
        "apk"
    }

    fn db_path(&self) -> &'static str {
        "lib/apk/db/installed"
    }

    fn parse(&self, content: &[u8]) -> Result<Vec<Package>, AnalyzeError> {
        let text = db_text(self.db_path(), content)?;
        let mut packages = Vec::new();
        let mut name: Option<&str> = None;
        let mut version: Option<&str> = None;

        for line in text.lines().chain(std::iter::once("")) {
            if line.is_empty() {
                // 레코드 경계
                if let (Some(n), Some(v)) = (name.take(), version.take()) {
                    packages.push(Package::new(n, v));
                }
                continue;
            }
            if let Some(value) = line.strip_prefix("P:") {
                name = Some(value);
            } else if let Some(value) = line.strip_prefix("V:") {
                version = Some(value);
            }
        }

        Ok(packages)
    }
}

pub(super) fn db_text(path: &str, content: &[u8]) -> Result<String, AnalyzeError> {
    String::from_utf8(content.to_vec()).map_err(|e| AnalyzeError::PackageDb {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}
