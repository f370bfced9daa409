//! OS 패키지 스캔 — 탐지기 레지스트리와 오케스트레이터
//!
//! OS 패밀리 → 탐지기 매핑은 닫힌, 정적으로 알려진 집합입니다.
//! 새 패밀리를 지원하려면 [`hullscan_core::contract::OsPackageDetector`]
//! 구현을 [`DetectorRegistry::register`]로 등록합니다 — 호출 지점은
//! 수정하지 않습니다.
//!
//! # 스캔 흐름
//!
//! ```text
//! FileMap --> identify_os --+-- 마커 없음 --> Ok(None)  (OS 스캔 미적용)
//!                           |
//!                           +-- 패밀리 식별 --> DetectorRegistry 조회
//!                                                 |
//!                            미등록 패밀리 --> UnsupportedOs (종료 에러)
//!                                                 |
//!                               enumerate_packages --> detector.detect
//! ```

pub mod alpine;
pub mod debian;
pub mod redhat;
pub mod ubuntu;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use hullscan_core::contract::OsPackageDetector;
use hullscan_core::error::ScanError;
use hullscan_core::types::{
    DetectedVulnerability, FileMap, OsFamily, OsRelease, Package, Severity,
};

use hullscan_analyzer::{enumerate_packages, identify_os};

use crate::advisory::{AdvisoryDb, is_affected};

pub use alpine::AlpineDetector;
pub use debian::DebianDetector;
pub use redhat::RedhatDetector;
pub use ubuntu::UbuntuDetector;

/// OS 패키지 스캔 결과
#[derive(Debug, Clone)]
pub struct OsScan {
    /// 식별된 OS
    pub os: OsRelease,
    /// 발견된 취약점 (탐지기 반환 순서 그대로)
    pub vulnerabilities: Vec<DetectedVulnerability>,
}

/// 탐지기 레지스트리
///
/// OS 패밀리 태그를 균일한 탐지 계약을 만족하는 탐지기 인스턴스로
/// 매핑합니다.
pub struct DetectorRegistry {
    detectors: HashMap<OsFamily, Arc<dyn OsPackageDetector>>,
}

impl DetectorRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            detectors: HashMap::new(),
        }
    }

    /// 기본 탐지기 4종이 등록된 레지스트리를 생성합니다.
    ///
    /// CentOS는 RedHat 탐지기를 공유합니다.
    pub fn with_defaults(db: Arc<AdvisoryDb>) -> Self {
        let mut registry = Self::new();
        let redhat: Arc<dyn OsPackageDetector> = Arc::new(RedhatDetector::new(Arc::clone(&db)));

        registry.register(OsFamily::Alpine, Arc::new(AlpineDetector::new(Arc::clone(&db))));
        registry.register(OsFamily::Debian, Arc::new(DebianDetector::new(Arc::clone(&db))));
        registry.register(OsFamily::Ubuntu, Arc::new(UbuntuDetector::new(db)));
        registry.register(OsFamily::RedHat, Arc::clone(&redhat));
        registry.register(OsFamily::CentOs, redhat);
        registry
    }

    /// 패밀리에 대한 탐지기를 등록합니다. 기존 등록은 대체됩니다.
    pub fn register(&mut self, family: OsFamily, detector: Arc<dyn OsPackageDetector>) {
        self.detectors.insert(family, detector);
    }

    /// 패밀리에 대한 탐지기를 조회합니다.
    pub fn detector_for(&self, family: &OsFamily) -> Option<&Arc<dyn OsPackageDetector>> {
        self.detectors.get(family)
    }

    /// 등록된 패밀리 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// 파일 맵에 대해 OS 패키지 스캔을 수행합니다.
///
/// # Returns
///
/// - `Ok(None)`: 인식 가능한 OS 마커 없음 — 호출자는 OS 스캔 대상을
///   생략합니다 (에러 아님)
/// - `Ok(Some(OsScan))`: 식별된 OS와 취약점 목록
/// - `Err(ScanError::UnsupportedOs)`: 패밀리가 레지스트리에 없음 —
///   부분 결과 없이 전체 호출이 실패해야 하는 종료 에러
pub fn scan_os_packages(
    files: &FileMap,
    registry: &DetectorRegistry,
) -> Result<Option<OsScan>, ScanError> {
    let os = identify_os(files).map_err(|e| ScanError::OsDetection { source: e })?;
    let Some(os) = os else {
        return Ok(None);
    };
    debug!(family = %os.family, version = %os.version, "os scan dispatching");

    let detector = registry
        .detector_for(&os.family)
        .ok_or_else(|| ScanError::UnsupportedOs {
            family: os.family.to_string(),
        })?;

    let packages =
        enumerate_packages(files).map_err(|e| ScanError::PackageEnumeration { source: e })?;
    debug!(packages = packages.len(), "packages enumerated for os scan");

    let vulnerabilities = detector.detect(&os.version, &packages)?;
    Ok(Some(OsScan {
        os,
        vulnerabilities,
    }))
}

/// 피드의 advisory를 패키지 목록과 대조하는 공통 매칭 루프
///
/// 각 탐지기 변형은 자기 릴리스 스트림 정규화만 제공하고
/// 매칭 자체는 이 함수를 사용합니다.
pub(crate) fn match_feed(
    db: &AdvisoryDb,
    feed: &str,
    release: Option<&str>,
    packages: &[Package],
) -> Vec<DetectedVulnerability> {
    let mut findings = Vec::new();

    for package in packages {
        for advisory in db.lookup(feed, &package.name) {
            if let (Some(stream), Some(wanted)) = (advisory.release.as_deref(), release)
                && stream != wanted
            {
                continue;
            }
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
