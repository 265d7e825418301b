//! 빈도순 어휘 파일 로드
//!
//! 한 줄에 `단어 출현횟수` 한 쌍. 형식이 틀린 줄은 전체 작업을 중단시킵니다.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 어휘 항목
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub word: String,
    pub occurrence_count: u64,
}

impl VocabularyEntry {
    pub fn new(word: impl Into<String>, occurrence_count: u64) -> Self {
        Self {
            word: word.into(),
            occurrence_count,
        }
    }
}

/// 어휘 파일 에러
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// 파일 읽기 실패
    #[error("어휘 파일 읽기 오류 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `단어 출현횟수` 형식이 아닌 줄
    #[error("어휘 파일 형식 오류 ({path}:{line_number}): {line:?}")]
    Format {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
}

/// 한 줄 파싱 (빈 줄은 None)
fn parse_line(line: &str) -> Option<Result<VocabularyEntry, ()>> {
    let mut fields = line.split_whitespace();
    let word = fields.next()?;
    let entry = match (fields.next(), fields.next()) {
        (Some(count), None) => count
            .parse::<u64>()
            .map(|count| VocabularyEntry::new(word, count))
            .map_err(|_| ()),
        _ => Err(()),
    };
    Some(entry)
}

/// 리더에서 어휘 로드 (`cutoff` 항목까지만)
///
/// `path`는 에러 메시지에만 쓰입니다.
pub fn read_vocabulary<R: BufRead>(
    reader: R,
    path: &Path,
    cutoff: Option<usize>,
) -> Result<Vec<VocabularyEntry>, VocabularyError> {
    let mut entries = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        if cutoff.is_some_and(|limit| entries.len() >= limit) {
            break;
        }

        let line = line.map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match parse_line(&line) {
            None => continue,
            Some(Ok(entry)) => entries.push(entry),
            Some(Err(())) => {
                return Err(VocabularyError::Format {
                    path: path.to_path_buf(),
                    line_number: index + 1,
                    line,
                })
            }
        }
    }

    Ok(entries)
}

/// 어휘 파일 로드
pub fn load_vocabulary(path: &Path, cutoff: Option<usize>) -> Result<Vec<VocabularyEntry>, VocabularyError> {
    let file = File::open(path).map_err(|source| VocabularyError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = read_vocabulary(BufReader::new(file), path, cutoff)?;
    log::info!("어휘 로드 완료: {} ({}개)", path.display(), entries.len());
    Ok(entries)
}
