//! 검토 대기열(triage) 파일 읽기/쓰기
//!
//! 한 줄에 `단어 점수 최고확률 출현횟수`, 점수 내림차순.
//! 실수는 소수점이 붙는 최단 왕복 표기(`-20.0`, `0.95`), NaN은 `NaN`으로 씁니다.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::score::RankedCandidate;
use crate::persistence::write_atomically;

/// 대기열 파일 에러
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("대기열 파일 입출력 오류 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("대기열 파일 형식 오류 ({path}:{line_number}): {line:?}")]
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
}

/// 실수 표기 (Debug 포맷은 `-20.0`, `NaN`처럼 사람이 읽을 수 있는 최단 왕복 표기)
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// 한 항목을 한 줄로
pub fn format_line(candidate: &RankedCandidate) -> String {
    format!(
        "{} {} {} {}",
        candidate.word,
        format_float(candidate.priority_score),
        format_float(candidate.top_probability),
        candidate.occurrence_count
    )
}

/// 이미 정렬된 항목을 라이터에 기록
pub fn write_lines<W: Write + ?Sized>(writer: &mut W, candidates: &[RankedCandidate]) -> io::Result<()> {
    for candidate in candidates {
        writeln!(writer, "{}", format_line(candidate))?;
    }
    Ok(())
}

/// 대기열 파일 저장 (전체를 다 쓴 뒤에만 대상 경로에 나타남)
pub fn write_triage(path: &Path, candidates: &[RankedCandidate]) -> Result<(), TriageError> {
    write_atomically(path, |writer| write_lines(writer, candidates)).map_err(|source| TriageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("대기열 저장: {} ({}개)", path.display(), candidates.len());
    Ok(())
}

fn parse_line(line: &str) -> Option<RankedCandidate> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 {
        return None;
    }
    Some(RankedCandidate {
        word: fields[0].to_string(),
        priority_score: fields[1].parse().ok()?,
        top_probability: fields[2].parse().ok()?,
        occurrence_count: fields[3].parse().ok()?,
    })
}

/// 대기열 파일 로드 (검토 도구가 앞에서부터 꺼내 씀)
pub fn read_triage(path: &Path) -> Result<Vec<RankedCandidate>, TriageError> {
    let io_error = |source| TriageError::Io {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(io_error)?);

    let mut candidates = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_error)?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Some(candidate) => candidates.push(candidate),
            None => {
                return Err(TriageError::Format {
                    path: path.to_path_buf(),
                    line_number: index + 1,
                    line,
                })
            }
        }
    }
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scored_line() {
        let c = RankedCandidate::scored("haus", 0.95, 500);
        let line = format_line(&c);
        assert!(line.starts_with("haus 0.13"));
        assert!(line.ends_with(" 0.95 500"));
    }

    #[test]
    fn test_format_failed_line() {
        let c = RankedCandidate::failed("xyzzyplonk", 2);
        assert_eq!(format_line(&c), "xyzzyplonk -20.0 NaN 2");
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voc_todo.txt");
        let list = vec![
            RankedCandidate::scored("haus", 0.95, 500),
            RankedCandidate::failed("xyzzyplonk", 2),
        ];

        write_triage(&path, &list).unwrap();
        let back = read_triage(&path).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].word, "haus");
        assert_eq!(back[0].priority_score, list[0].priority_score);
        assert_eq!(back[0].top_probability, 0.95);
        assert_eq!(back[1].priority_score, -20.0);
        assert!(back[1].top_probability.is_nan());
        assert_eq!(back[1].occurrence_count, 2);
    }

    #[test]
    fn test_read_malformed_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "haus 0.1 0.9 500\nmaus 0.1\n").unwrap();

        let err = read_triage(&path).unwrap_err();
        assert!(matches!(err, TriageError::Format { line_number: 2, .. }));
    }
}
