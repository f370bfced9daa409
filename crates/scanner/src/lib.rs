#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`advisory`]: 로컬 advisory DB 로딩/조회, 버전 범위 매칭
//! - [`ospkg`]: 탐지기 레지스트리 + OS 패키지 스캔 오케스트레이터
//! - [`library`]: 매니페스트 발견 + 생태계별 취약점 조회
//! - [`scan`]: `ScanRunner` — 스캔 호출 진입점

pub mod advisory;
pub mod library;
pub mod ospkg;
pub mod scan;

pub use advisory::{Advisory, AdvisoryDb, VersionRange};
pub use library::{CargoLockParser, LockfileLibraryScanner, ManifestParser, NpmLockParser};
pub use ospkg::{
    AlpineDetector, DebianDetector, DetectorRegistry, OsScan, RedhatDetector, UbuntuDetector,
    scan_os_packages,
};
pub use scan::{ScanOutcome, ScanRunner};
