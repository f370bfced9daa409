//! Cargo.lock 파서
//!
//! `[[package]]` 테이블의 name/version만 읽습니다. 의존성 그래프 해석은
//! 취약점 매칭에 필요하지 않습니다.

use serde::Deserialize;

use hullscan_core::error::ScanError;
use hullscan_core::types::Package;

use super::ManifestParser;

/// Cargo.lock 파서
pub struct CargoLockParser;

#[derive(Deserialize)]
struct CargoLockFile {
    #[serde(default)]
    package: Vec<CargoLockPackage>,
}

#[derive(Deserialize)]
struct CargoLockPackage {
    name: String,
    version: String,
}

impl ManifestParser for CargoLockParser {
    fn ecosystem(&self) -> &'static str {
        "cargo"
    }

    fn can_parse(&self, path: &str) -> bool {
        path.rsplit('/').next() == Some("Cargo.lock")
    }

    fn parse(&self, content: &[u8], source_path: &str) -> Result<Vec<Package>, ScanError> {
        let text = std::str::from_utf8(content).map_err(|e| ScanError::Library {
            path: source_path.to_owned(),
            reason: e.to_string(),
        })?;
        let lock_file: CargoLockFile = toml::from_str(text).map_err(|e| ScanError::Library {
            path: source_path.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(lock_file
            .package
            .into_iter()
            .map(|p| Package::new(p.name, p.version))
            .collect())
    }
}
