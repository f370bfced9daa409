//! 표 형식 렌더러
//!
//! 각 스캔 대상에 대해 독립적으로:
//!
//! 1. 대상 이름과 이름 길이만큼의 `=` 밑줄
//! 2. `Total: N (CRITICAL: a, HIGH: b, ...)` 요약 라인 (정규 표시 순서)
//! 3. 취약점이 있으면 표 본문 — 없으면 여기서 끝
//!
//! 심각도 칸의 색상은 생성 시점에 고정된 `rich` 플래그로만 켜집니다.
//! 인접 행에서 같은 값이 반복되는 칸은 빈칸으로 렌더링(시각적 병합)되고,
//! 모든 행 사이에 구분선이 그려집니다.

use std::io::Write;

use colored::Colorize;

use hullscan_core::error::ReportError;
use hullscan_core::types::{OsRelease, ScanEntry, ScanResults, Severity, SeverityCounts};

use crate::ReportWriter;

/// 표 헤더 열
const HEADERS: [&str; 6] = [
    "Library",
    "Vulnerability ID",
    "Severity",
    "Installed Version",
    "Fixed Version",
    "Title",
];

/// 심각도 열 인덱스 — 색상 적용 대상
const SEVERITY_COLUMN: usize = 2;

/// 제목 칸에 허용되는 최대 단어 수
const MAX_TITLE_WORDS: usize = 12;

/// 표 형식 리포트 작성기
///
/// `rich`는 "풍부한 서식 지원" 속성입니다 — 호출자가 싱크 생성 시점에
/// 한 번 결정하며(대화형 표준 출력 여부), 호출마다 다시 추정하지
/// 않습니다.
pub struct TableWriter<W> {
    output: W,
    rich: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(output: W, rich: bool) -> Self {
        Self { output, rich }
    }

    /// 내부 싱크를 꺼냅니다 (테스트용).
    pub fn into_inner(self) -> W {
        self.output
    }

    fn write_entry(&mut self, entry: &ScanEntry) -> Result<(), ReportError> {
        let counts = SeverityCounts::tally(&entry.vulnerabilities);
        let summary: Vec<String> = Severity::DISPLAY_ORDER
            .iter()
            .map(|severity| format!("{}: {}", severity, counts.count(*severity)))
            .collect();

        writeln!(self.output)?;
        writeln!(self.output, "{}", entry.target)?;
        writeln!(self.output, "{}", "=".repeat(entry.target.chars().count()))?;
        writeln!(
            self.output,
            "Total: {} ({})",
            entry.vulnerabilities.len(),
            summary.join(", ")
        )?;
        writeln!(self.output)?;

        if entry.vulnerabilities.is_empty() {
            return Ok(());
        }

        let rows: Vec<[String; 6]> = entry
            .vulnerabilities
            .iter()
            .map(|v| {
                [
                    v.package.clone(),
                    v.id.clone(),
                    v.severity.name().to_owned(),
                    v.installed_version.clone(),
                    v.fixed_version.clone().unwrap_or_default(),
                    display_title(&v.title, &v.description),
                ]
            })
            .collect();

        self.write_table(&rows)
    }

    fn write_table(&mut self, rows: &[[String; 6]]) -> Result<(), ReportError> {
        let mut widths: [usize; 6] = HEADERS.map(str::len);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let separator = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .fold(String::from("+"), |acc, dashes| acc + &dashes + "+");

        writeln!(self.output, "{separator}")?;
        let header_cells: Vec<String> = HEADERS
            .iter()
            .zip(widths.iter())
            .map(|(h, w)| pad(h, *w))
            .collect();
        writeln!(self.output, "| {} |", header_cells.join(" | "))?;
        writeln!(self.output, "{separator}")?;

        let mut previous: Option<&[String; 6]> = None;
        for row in rows {
            let mut cells = Vec::with_capacity(6);
            for (column, (cell, width)) in row.iter().zip(widths.iter()).enumerate() {
                // 직전 행과 같은 값은 빈칸으로 병합
                let merged = previous.is_some_and(|prev| prev[column] == *cell);
                let text = if merged { "" } else { cell.as_str() };
                let padded = pad(text, *width);
                if column == SEVERITY_COLUMN && self.rich && !merged {
                    cells.push(colorize_severity(&padded, cell).to_string());
                } else {
                    cells.push(padded);
                }
            }
            writeln!(self.output, "| {} |", cells.join(" | "))?;
            writeln!(self.output, "{separator}")?;
            previous = Some(row);
        }

        Ok(())
    }
}

impl<W: Write> ReportWriter for TableWriter<W> {
    fn write(
        &mut self,
        _os: Option<&OsRelease>,
        results: &ScanResults,
    ) -> Result<(), ReportError> {
        for entry in results {
            self.write_entry(entry)?;
        }
        self.output.flush()?;
        Ok(())
    }
}

/// 제목 칸에 들어갈 문자열을 만듭니다.
///
/// 제목이 비어 있으면 설명으로 대체하고, 공백 기준 12단어를 넘으면
/// 앞 12단어만 남기고 말줄임 표시를 붙입니다. 정확히 12단어인 제목은
/// 자르지 않습니다.
fn display_title(title: &str, description: &str) -> String {
    let text = if title.is_empty() { description } else { title };
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > MAX_TITLE_WORDS {
        format!("{}...", words[..MAX_TITLE_WORDS].join(" "))
    } else {
        text.to_owned()
    }
}

/// 표시 폭 기준으로 오른쪽 공백을 채웁니다.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    let mut padded = String::with_capacity(width);
    padded.push_str(text);
    padded.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    padded
}

/// 심각도 이름을 터미널 색상으로 감쌉니다.
///
/// 패딩이 끝난 문자열을 감싸야 ANSI 코드가 칸 폭 계산을 깨지 않습니다.
fn colorize_severity(padded: &str, severity: &str) -> colored::ColoredString {
    match severity {
        "CRITICAL" => padded.red().bold(),
        "HIGH" => padded.red(),
        "MEDIUM" => padded.yellow(),
        "LOW" => padded.normal(),
        _ => padded.dimmed(),
    }
}
