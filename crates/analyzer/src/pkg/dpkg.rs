//! dpkg 상태 파일 파서
//!
//! Debian/Ubuntu의 `var/lib/dpkg/status`는 빈 줄로 구분된 문단이며,
//! `Package:` / `Version:` / `Status:` 필드를 읽습니다.
//! `Status`에 `installed`가 포함된 문단만 설치 패키지로 간주합니다.

use hullscan_core::error::AnalyzeError;
use hullscan_core::types::Package;

use super::PackageAnalyzer;
use super::apk::db_text;

/// dpkg 상태 파일 분석기
pub struct DpkgAnalyzer;

impl PackageAnalyzer for DpkgAnalyzer {
    fn name(&self) -> &'static str {
        "dpkg"
    }

    fn db_path(&self) -> &'static str {
        "var/lib/dpkg/status"
    }

    fn parse(&self, content: &[u8]) -> Result<Vec<Package>, AnalyzeError> {
        let text = db_text(self.db_path(), content)?;
        let mut packages = Vec::new();
        let mut name: Option<&str> = None;
        let mut version: Option<&str> = None;
        let mut installed = false;

        for line in text.lines().chain(std::iter::once("")) {
            if line.is_empty() {
                if installed
                    && let (Some(n), Some(v)) = (name, version)
                {
                    packages.push(Package::new(n, v));
                }
                name = None;
                version = None;
                installed = false;
                continue;
            }
            if let Some(value) = line.strip_prefix("Package:") {
                name = Some(value.trim());
            } else if let Some(value) = line.strip_prefix("Version:") {
                version = Some(value.trim());
            } else if let Some(value) = line.strip_prefix("Status:") {
                installed = value.contains("installed") && !value.contains("deinstall");
            }
        }

        Ok(packages)
    }
}
