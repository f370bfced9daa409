#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`table`]: 사람용 표 형식 렌더러 ([`TableWriter`])
//! - [`json`]: 기계용 JSON 렌더러 ([`JsonWriter`])

pub mod json;
pub mod table;

use hullscan_core::error::ReportError;
use hullscan_core::types::{OsRelease, ScanResults};

pub use json::{JsonReport, JsonSummary, JsonWriter};
pub use table::TableWriter;

/// 리포트 작성기 trait
///
/// 식별된 OS(있다면)와 집계된 결과 집합을 받아 출력 싱크에 씁니다.
pub trait ReportWriter {
    fn write(&mut self, os: Option<&OsRelease>, results: &ScanResults)
    -> Result<(), ReportError>;
}
