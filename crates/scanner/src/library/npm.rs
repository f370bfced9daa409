//! package-lock.json 파서
//!
//! v2/v3의 `packages` 맵을 우선 사용하고, 비어 있으면 v1의
//! `dependencies` 맵으로 fallback합니다.

use std::collections::BTreeMap;

use serde::Deserialize;

use hullscan_core::error::ScanError;
use hullscan_core::types::Package;

use super::ManifestParser;

/// package-lock.json 파서
pub struct NpmLockParser;

#[derive(Deserialize)]
struct NpmLockFile {
    #[serde(default)]
    packages: BTreeMap<String, NpmPackageEntry>,
    #[serde(default)]
    dependencies: BTreeMap<String, NpmDependencyEntry>,
}

#[derive(Deserialize)]
struct NpmPackageEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Deserialize)]
struct NpmDependencyEntry {
    #[serde(default)]
    version: Option<String>,
}

impl ManifestParser for NpmLockParser {
    fn ecosystem(&self) -> &'static str {
        "npm"
    }

    fn can_parse(&self, path: &str) -> bool {
        path.rsplit('/').next() == Some("package-lock.json")
    }

    fn parse(&self, content: &[u8], source_path: &str) -> Result<Vec<Package>, ScanError> {
        let lock_file: NpmLockFile =
            serde_json::from_slice(content).map_err(|e| ScanError::Library {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut packages = Vec::new();

        if !lock_file.packages.is_empty() {
            for (key, entry) in &lock_file.packages {
                // 루트 패키지는 키가 빈 문자열
                if key.is_empty() {
                    continue;
                }
                let Some(version) = &entry.version else {
                    continue;
                };
                let name = entry
                    .name
                    .clone()
                    .unwrap_or_else(|| package_name_from_key(key));
                packages.push(Package::new(name, version.clone()));
            }
            return Ok(packages);
        }

        for (name, entry) in &lock_file.dependencies {
            if let Some(version) = &entry.version {
                packages.push(Package::new(name.clone(), version.clone()));
            }
        }
        Ok(packages)
    }
}

/// `node_modules/@scope/pkg` 키에서 패키지 이름을 추출합니다.
fn package_name_from_key(key: &str) -> String {
    match key.rfind("node_modules/") {
        Some(idx) => key[idx + "node_modules/".len()..].to_owned(),
        None => key.to_owned(),
    }
}
