//! 검토할 단어 목록 로드
//!
//! 한 줄이 목록의 한 항목입니다 (줄 끝 개행만 제거).

use std::fs;
use std::path::Path;

use super::store::LexiconError;

pub fn read_wordlist(path: &Path) -> Result<Vec<String>, LexiconError> {
    let text = fs::read_to_string(path).map_err(|e| LexiconError::io(path, e))?;
    Ok(text
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}
