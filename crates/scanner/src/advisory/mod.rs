//! 취약점 advisory — 로컬 DB 조회 및 버전 범위 매칭
//!
//! 피드의 수집·갱신은 외부 동기화 도구의 몫이며, 이 모듈은 이미
//! 디렉토리에 존재하는 JSON 피드만 읽습니다.

pub mod db;
pub mod version;

pub use db::{Advisory, AdvisoryDb, VersionRange};
pub use version::is_affected;
