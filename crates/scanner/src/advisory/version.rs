//! 버전 범위 매칭
//!
//! `semver` 크레이트로 버전이 advisory 영향 범위에 포함되는지 확인합니다.
//! 배포판 패키지 버전은 대부분 SemVer가 아니므로 파싱이 실패하면
//! 문자열 비교로 fallback합니다. 패키징 형식별 정밀 비교는 이 코어의
//! 범위 밖이며, 이 매칭은 계약이 아닙니다.

use super::db::VersionRange;

/// 주어진 버전이 영향 범위 중 하나에 포함되는지 확인합니다.
///
/// # 매칭 규칙
///
/// - `introduced`가 None이면 시작 제한 없음
/// - `fixed`가 None이면 아직 수정되지 않음
/// - `introduced <= version < fixed`이면 영향받음
///
/// 범위가 비어 있으면 매칭하지 않습니다.
pub fn is_affected(version_str: &str, ranges: &[VersionRange]) -> bool {
    ranges.iter().any(|range| is_in_range(version_str, range))
}

fn is_in_range(version_str: &str, range: &VersionRange) -> bool {
    if let Ok(version) = semver::Version::parse(version_str) {
        return is_in_range_semver(&version, range);
    }
    is_in_range_string(version_str, range)
}

/// SemVer 버전으로 범위 매칭
fn is_in_range_semver(version: &semver::Version, range: &VersionRange) -> bool {
    if let Some(ref introduced) = range.introduced
        && let Ok(intro_ver) = semver::Version::parse(introduced)
        && version < &intro_ver
    {
        return false;
    }

    if let Some(ref fixed) = range.fixed
        && let Ok(fix_ver) = semver::Version::parse(fixed)
        && version >= &fix_ver
    {
        return false;
    }

    true
}

/// 문자열 비교로 범위 매칭 (SemVer 파싱 실패 시 fallback)
fn is_in_range_string(version: &str, range: &VersionRange) -> bool {
    if let Some(ref introduced) = range.introduced
        && version < introduced.as_str()
    {
        return false;
    }

    if let Some(ref fixed) = range.fixed
        && version >= fixed.as_str()
    {
        return false;
    }

    true
}
