//! G2P 엔진 출력 파싱
//!
//! 엔진 출력은 탭으로 구분된 줄 단위 텍스트입니다.
//! - 변이형 모드: `<단어>\t<순번>\t<확률>\t<음소열>`
//! - 단일/배치 모드: `<단어>\t<음소열>`
//!
//! 진단 메시지 줄과 필드가 부족한 줄은 데이터가 아닌 잡음으로 버립니다.

use std::collections::{HashMap, HashSet};

use super::engine::PhonemeCandidate;

/// 엔진이 섞어 내보내는 진단 메시지 표식
pub const DIAGNOSTIC_MARKER: &str = "stack usage";

const FIELD_SEPARATOR: char = '\t';

/// 엔진에 넘기기 전 단어 정규화 (하이픈 제거: 복합어를 한 덩어리로 취급)
pub fn normalize_word(word: &str) -> String {
    word.replace('-', "")
}

/// 진단 줄이면 true
fn is_diagnostic(line: &str) -> bool {
    line.contains(DIAGNOSTIC_MARKER)
}

/// 줄을 정리하고 필드로 분리 (진단 줄이면 None)
fn split_fields(raw: &str) -> Option<Vec<&str>> {
    let line = raw.trim();
    if line.is_empty() || is_diagnostic(line) {
        return None;
    }
    Some(line.split(FIELD_SEPARATOR).collect())
}

/// 변이형 모드 출력에서 `word`의 후보를 최대 `limit`개 추출
///
/// 첫 필드가 `word`와 정확히 일치하는 줄만 받습니다.
/// 부분 문자열 일치는 다른 단어의 줄에 잘못 묶일 수 있습니다.
pub fn parse_variant_output(output: &str, word: &str, limit: usize) -> Vec<PhonemeCandidate> {
    let mut candidates = Vec::new();

    for raw in output.lines() {
        if candidates.len() >= limit {
            break;
        }

        let Some(fields) = split_fields(raw) else {
            log::debug!("잡음 줄 무시: {}", raw);
            continue;
        };
        if fields.len() < 4 || fields[0].trim() != word {
            continue;
        }

        let probability = match fields[2].trim().parse::<f64>() {
            Ok(p) if (0.0..=1.0).contains(&p) => p,
            _ => {
                log::debug!("확률 파싱 실패, 줄 무시: {}", raw);
                continue;
            }
        };

        let transcription = fields[3].trim();
        if transcription.is_empty() {
            continue;
        }

        candidates.push(PhonemeCandidate::new(transcription, probability));
    }

    candidates
}

/// 단일 모드 출력에서 `word`의 음소열 추출 (마지막 일치 줄 우선)
pub fn parse_single_output(output: &str, word: &str) -> Option<String> {
    let mut found = None;

    for raw in output.lines() {
        let Some(fields) = split_fields(raw) else {
            continue;
        };
        if fields.len() < 2 || fields[0].trim() != word {
            continue;
        }
        let transcription = fields[1].trim();
        if !transcription.is_empty() {
            found = Some(transcription.to_string());
        }
    }

    found
}

/// 배치 모드 출력을 단어 → 음소열 맵으로 변환
///
/// 첫 필드가 입력 단어 집합에 없는 줄은 조용히 무시합니다.
pub fn parse_multi_output(output: &str, words: &HashSet<&str>) -> HashMap<String, String> {
    let mut phonemes = HashMap::new();

    for raw in output.lines() {
        let Some(fields) = split_fields(raw) else {
            continue;
        };
        if fields.len() < 2 {
            continue;
        }

        let word = fields[0].trim();
        if words.contains(word) {
            phonemes.insert(word.to_string(), fields[1].trim().to_string());
        }
    }

    phonemes
}
