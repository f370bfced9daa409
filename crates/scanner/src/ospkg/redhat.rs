//! RedHat/CentOS 탐지기
//!
//! RHEL과 CentOS는 같은 advisory 피드를 공유하며, 메이저 릴리스(`7`, `8`)
//! 단위로 매칭합니다. 레지스트리는 두 패밀리 모두에 이 탐지기를
//! 등록합니다.

use std::sync::Arc;

use hullscan_core::contract::OsPackageDetector;
use hullscan_core::error::ScanError;
use hullscan_core::types::{DetectedVulnerability, OsFamily, Package};

use crate::advisory::AdvisoryDb;
use crate::ospkg::match_feed;

const FEED: &str = "redhat";

/// RedHat/CentOS OS 패키지 탐지기
pub struct RedhatDetector {
    db: Arc<AdvisoryDb>,
}

impl RedhatDetector {
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }

    /// `7.6.1810` → `7`
    fn major_release(os_version: &str) -> &str {
        os_version.split('.').next().unwrap_or(os_version)
    }
}

impl OsPackageDetector for RedhatDetector {
    fn family(&self) -> OsFamily {
        OsFamily::RedHat
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
