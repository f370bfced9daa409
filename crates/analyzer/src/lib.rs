#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`extract`]: tar/tar.gz rootfs 및 docker-save 아카이브 전개
//! - [`docker`]: `ImageSource` trait + bollard 구현
//! - [`os`]: 마커 파일 기반 OS 식별
//! - [`pkg`]: apk/dpkg 패키지 데이터베이스 파서

pub mod docker;
pub mod extract;
pub mod os;
pub mod pkg;

pub use docker::{BollardImageSource, ImageSource};
pub use extract::{extract_archive, unpack_image_archive};
pub use os::identify_os;
pub use pkg::{ApkAnalyzer, DpkgAnalyzer, PackageAnalyzer, enumerate_packages};
