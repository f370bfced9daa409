//! 패키지 열거 — OS 패키지 데이터베이스 파서
//!
//! [`PackageAnalyzer`] trait은 각 패키지 관리자의 설치 DB 파서가
//! 구현해야 하는 인터페이스입니다. 새 패키지 형식을 지원하려면
//! 이 trait을 구현하고 [`enumerate_packages`]의 분석기 목록에 추가합니다.
//!
//! # 지원 형식
//!
//! - apk (`lib/apk/db/installed`) — [`ApkAnalyzer`]
//! - dpkg (`var/lib/dpkg/status`) — [`DpkgAnalyzer`]

pub mod apk;
pub mod dpkg;

use tracing::debug;

use hullscan_core::error::AnalyzeError;
use hullscan_core::types::{FileMap, Package};

pub use apk::ApkAnalyzer;
pub use dpkg::DpkgAnalyzer;

/// 패키지 데이터베이스 분석기 trait
pub trait PackageAnalyzer: Send + Sync {
    /// 분석기 이름 (로그·에러 메시지용)
    fn name(&self) -> &'static str;

    /// 이 분석기가 읽는 패키지 DB의 파일 맵 경로
    fn db_path(&self) -> &'static str;

    /// DB 내용을 파싱하여 설치 패키지 목록을 반환합니다.
    ///
    /// 반환 순서는 DB 파일의 기록 순서를 따릅니다.
    fn parse(&self, content: &[u8]) -> Result<Vec<Package>, AnalyzeError>;
}

/// 파일 맵에서 설치 패키지를 열거합니다.
///
/// 등록된 분석기 중 자기 DB 파일이 존재하는 첫 분석기가 사용됩니다.
/// 어떤 패키지 DB도 없으면 빈 목록을 반환합니다 (에러 아님).
/// DB가 존재하지만 파싱할 수 없으면 에러입니다.
pub fn enumerate_packages(files: &FileMap) -> Result<Vec<Package>, AnalyzeError> {
    let analyzers: [&dyn PackageAnalyzer; 2] = [&ApkAnalyzer, &DpkgAnalyzer];

    for analyzer in analyzers {
        if let Some(content) = files.get(analyzer.db_path()) {
            let packages = analyzer.parse(content)?;
            debug!(
                analyzer = analyzer.name(),
                packages = packages.len(),
                "packages enumerated"
            );
            return Ok(packages);
        }
    }

    debug!("no package database found");
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_prefers_present_database() {
        let mut files = FileMap::new();
        files.insert(
            "lib/apk/db/installed".to_owned(),
            b"P:musl\nV:1.1.22-r3\n\n".to_vec(),
        );
        let packages = enumerate_packages(&files).unwrap();
        assert_eq!(packages, vec![Package::new("musl", "1.1.22-r3")]);
    }

    #[test]
    fn enumerate_empty_filesystem() {
        let packages = enumerate_packages(&FileMap::new()).unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn corrupt_database_propagates_error() {
        let mut files = FileMap::new();
        files.insert("var/lib/dpkg/status".to_owned(), vec![0xff, 0xfe]);
        let err = enumerate_packages(&files).unwrap_err();
        assert!(matches!(err, AnalyzeError::PackageDb { .. }));
    }
}
