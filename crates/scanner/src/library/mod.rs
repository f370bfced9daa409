//! 라이브러리 스캔 — 의존성 매니페스트 발견과 생태계별 취약점 조회
//!
//! [`ManifestParser`] trait은 각 매니페스트 형식의 파서가 구현해야 하는
//! 인터페이스입니다. [`LockfileLibraryScanner`]는 파일 맵을 순회하며
//! 파싱 가능한 매니페스트를 발견하고, 파싱된 패키지를 해당 생태계의
//! advisory 피드와 대조합니다.
//!
//! # 지원 형식
//!
//! - `Cargo.lock` (TOML) — [`CargoLockParser`]
//! - `package-lock.json` (JSON) — [`NpmLockParser`]
//!
//! # 확장
//!
//! 새로운 생태계를 지원하려면 `ManifestParser`를 구현하고
//! [`LockfileLibraryScanner::with_parsers`]로 등록합니다.

pub mod cargo;
pub mod npm;

use std::sync::Arc;

use tracing::debug;

use hullscan_core::contract::LibraryScanner;
use hullscan_core::error::ScanError;
use hullscan_core::types::{DetectedVulnerability, FileMap, Package, ScanOptions, Severity};

use crate::advisory::{AdvisoryDb, is_affected};

pub use cargo::CargoLockParser;
pub use npm::NpmLockParser;

/// 의존성 매니페스트 파서 trait
pub trait ManifestParser: Send + Sync {
    /// 이 파서가 대응하는 advisory 피드 이름 (생태계)
    fn ecosystem(&self) -> &'static str;

    /// 주어진 경로의 파일을 이 파서가 처리할 수 있는지 확인합니다.
    ///
    /// 파일 이름 패턴으로 판별합니다 (예: "Cargo.lock").
    fn can_parse(&self, path: &str) -> bool;

    /// 매니페스트 내용을 파싱하여 패키지 목록을 반환합니다.
    fn parse(&self, content: &[u8], source_path: &str) -> Result<Vec<Package>, ScanError>;
}

/// Lockfile 기반 라이브러리 스캐너
///
/// core의 [`LibraryScanner`] 계약을 구현합니다. 발견 순서는 파일 맵의
/// (결정적) 경로 순서를 따르며, 발견된 매니페스트는 취약점이 없어도
/// 항목으로 포함됩니다.
pub struct LockfileLibraryScanner {
    db: Arc<AdvisoryDb>,
    parsers: Vec<Box<dyn ManifestParser>>,
}

impl LockfileLibraryScanner {
    /// 기본 파서(Cargo, npm)가 등록된 스캐너를 생성합니다.
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self::with_parsers(db, vec![Box::new(CargoLockParser), Box::new(NpmLockParser)])
    }

    /// 파서 목록을 직접 지정해 스캐너를 생성합니다.
    pub fn with_parsers(db: Arc<AdvisoryDb>, parsers: Vec<Box<dyn ManifestParser>>) -> Self {
        Self { db, parsers }
    }

    fn parser_for(&self, path: &str) -> Option<&dyn ManifestParser> {
        self.parsers
            .iter()
            .find(|p| p.can_parse(path))
            .map(|p| p.as_ref())
    }

    /// 파싱된 패키지를 생태계 피드와 대조합니다.
    fn match_packages(&self, ecosystem: &str, packages: &[Package]) -> Vec<DetectedVulnerability> {
        let mut findings = Vec::new();
        for package in packages {
            for advisory in self.db.lookup(ecosystem, &package.name) {
                if !is_affected(&package.version, &advisory.affected) {
                    continue;
                }
                findings.push(DetectedVulnerability {
                    id: advisory.id.clone(),
                    package: package.name.clone(),
                    installed_version: package.version.clone(),
                    fixed_version: advisory.fixed_version.clone(),
                    severity: Severity::classify(&advisory.severity),
                    title: advisory.title.clone(),
                    description: advisory.description.clone(),
                });
            }
        }
        findings
    }
}

impl LibraryScanner for LockfileLibraryScanner {
    fn scan_manifests(
        &self,
        files: &FileMap,
        _options: &ScanOptions,
    ) -> Result<Vec<(String, Vec<DetectedVulnerability>)>, ScanError> {
        let mut results = Vec::new();

        for (path, content) in files {
            let Some(parser) = self.parser_for(path) else {
                continue;
            };
            let packages = parser.parse(content, path)?;
            let findings = self.match_packages(parser.ecosystem(), &packages);
            debug!(
                path = %path,
                ecosystem = parser.ecosystem(),
                packages = packages.len(),
                findings = findings.len(),
                "manifest scanned"
            );
            results.push((path.clone(), findings));
        }

        Ok(results)
    }

    fn scan_manifest(
        &self,
        name: &str,
        content: &[u8],
    ) -> Result<Vec<DetectedVulnerability>, ScanError> {
        let parser = self.parser_for(name).ok_or_else(|| ScanError::Library {
            path: name.to_owned(),
            reason: "unsupported manifest format".to_owned(),
        })?;
        let packages = parser.parse(content, name)?;
        Ok(self.match_packages(parser.ecosystem(), &packages))
    }
}
