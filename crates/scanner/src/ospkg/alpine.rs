//! Alpine 탐지기
//!
//! Alpine secdb advisory는 `3.10`, `3.9` 같은 major.minor 브랜치 단위로
//! 발행되므로, 전체 버전(`3.10.2`)을 브랜치로 정규화해 매칭합니다.

use std::sync::Arc;

use hullscan_core::contract::OsPackageDetector;
use hullscan_core::error::ScanError;
use hullscan_core::types::{DetectedVulnerability, OsFamily, Package};

use crate::advisory::AdvisoryDb;
use crate::ospkg::match_feed;

const FEED: &str = "alpine";

/// Alpine OS 패키지 탐지기
pub struct AlpineDetector {
    db: Arc<AdvisoryDb>,
}

impl AlpineDetector {
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }

    /// `3.10.2` → `3.10`
    fn release_branch(os_version: &str) -> String {
        os_version
            .split('.')
            .take(2)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl OsPackageDetector for AlpineDetector {
    fn family(&self) -> OsFamily {
        OsFamily::Alpine
    }

    fn detect(
        &self,
        os_version: &str,
        packages: &[Package],
    ) -> Result<Vec<DetectedVulnerability>, ScanError> {
        let branch = Self::release_branch(os_version);
        Ok(match_feed(&self.db, FEED, Some(&branch), packages))
    }
}
