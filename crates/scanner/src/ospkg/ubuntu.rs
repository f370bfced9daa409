//! Ubuntu 탐지기
//!
//! Ubuntu CVE tracker advisory는 릴리스 버전(`18.04`, `20.04`)을 그대로
//! 사용하므로 정규화 없이 매칭합니다.

use std::sync::Arc;

use hullscan_core::contract::OsPackageDetector;
use hullscan_core::error::ScanError;
use hullscan_core::types::{DetectedVulnerability, OsFamily, Package};

use crate::advisory::AdvisoryDb;
use crate::ospkg::match_feed;

const FEED: &str = "ubuntu";

/// Ubuntu OS 패키지 탐지기
pub struct UbuntuDetector {
    db: Arc<AdvisoryDb>,
}

impl UbuntuDetector {
    pub fn new(db: Arc<AdvisoryDb>) -> Self {
        Self { db }
    }
}

impl OsPackageDetector for UbuntuDetector {
    fn family(&self) -> OsFamily {
        OsFamily::Ubuntu
    }

    fn detect(
        &self,
        os_version: &str,
        packages: &[Package],
    ) -> Result<Vec<DetectedVulnerability>, ScanError> {
        Ok(match_feed(&self.db, FEED, Some(os_version), packages))
    }
}
