//! Debian 탐지기
//!
//! Debian security tracker advisory는 메이저 릴리스(`9`, `10`) 단위이므로
//! 전체 버전(`9.8`)을 메이저로 정규화해 매칭합니다.

use std::sync::Arc;

use hullscan_core::contract::OsPackageDetector;
use hullscan_core::error::ScanError;
use hullscan_core::types::{DetectedVulnerability, OsFamily, Package};

use crate::advisory::AdvisoryDb;
use crate::ospkg::match_feed;

const FEED: &str = "debian";

/// Debian OS 패키지 탐지기
pub struct DebianDetector {
    db: Arc<AdvisoryDb>,
}

impl DebianDetector {
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }

    /// `9.8` → `9` (sid 등 비수치 버전은 그대로)
    fn major_release(os_version: &str) -> &str {
        os_version.split('.').next().unwrap_or(os_version)
    }
}

impl OsPackageDetector for DebianDetector {
    fn family(&self) -> OsFamily {
        OsFamily::Debian
    }

    fn detect(
        &self,
        os_version: &str,
        packages: &[Package],
    ) -> Result<Vec<DetectedVulnerability>, ScanError> {
        let release = Self::major_release(os_version);
        Ok(match_feed(&self.db, FEED, Some(release), packages))
    }
}
