//! G2P 엔진 인터페이스
//!
//! 호출자는 엔진이 서브프로세스인지, 네이티브 라이브러리인지,
//! 원격 서비스인지 알 필요가 없습니다.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// 단어 하나에 대한 발음 후보
#[derive(Debug, Clone, PartialEq)]
pub struct PhonemeCandidate {
    /// 엔진 고유 표기법의 음소열
    pub transcription: String,
    /// 엔진이 보고한 확률 (0.0 ~ 1.0)
    pub probability: f64,
}

impl PhonemeCandidate {
    pub fn new(transcription: impl Into<String>, probability: f64) -> Self {
        Self {
            transcription: transcription.into(),
            probability,
        }
    }
}

/// G2P 엔진 호출 에러
#[derive(Debug, Error)]
pub enum G2pError {
    /// 엔진 프로세스 실행 실패
    #[error("G2P 엔진 실행 실패 ({command}): {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// 임시 파일 / 파이프 입출력 실패
    #[error("G2P 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 제한 시간 초과 (프로세스는 종료됨)
    #[error("G2P 엔진 응답 시간 초과 ({0:?})")]
    Timeout(Duration),
    /// 잘못된 요청 인자
    #[error("잘못된 G2P 요청: {0}")]
    InvalidRequest(String),
}

/// 단어 → 발음 후보 변환기
///
/// 빈 결과는 "모르는 단어"를 의미하며 에러가 아닙니다.
pub trait G2pEngine: Send + Sync {
    /// 최대 `variant_count`개의 발음 후보를 엔진 순서(최선 우선)로 반환
    fn generate_variants(
        &self,
        word: &str,
        variant_count: usize,
        quiet: bool,
    ) -> Result<Vec<PhonemeCandidate>, G2pError>;

    /// 최선의 발음 하나
    fn generate_phoneme(&self, word: &str) -> Result<Option<String>, G2pError> {
        Ok(self
            .generate_variants(word, 1, true)?
            .into_iter()
            .next()
            .map(|c| c.transcription))
    }

    /// 여러 단어를 한 번에 변환 (단어 → 음소열)
    fn generate_phonemes_multi(&self, words: &[String]) -> Result<HashMap<String, String>, G2pError> {
        let mut phonemes = HashMap::new();
        for word in words {
            if let Some(phn) = self.generate_phoneme(word)? {
                phonemes.insert(word.clone(), phn);
            }
        }
        Ok(phonemes)
    }
}

impl<T: G2pEngine + ?Sized> G2pEngine for &T {
    fn generate_variants(
        &self,
        word: &str,
        variant_count: usize,
        quiet: bool,
    ) -> Result<Vec<PhonemeCandidate>, G2pError> {
        (**self).generate_variants(word, variant_count, quiet)
    }

    fn generate_phoneme(&self, word: &str) -> Result<Option<String>, G2pError> {
        (**self).generate_phoneme(word)
    }

    fn generate_phonemes_multi(&self, words: &[String]) -> Result<HashMap<String, String>, G2pError> {
        (**self).generate_phonemes_multi(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEngine;

    impl G2pEngine for FixedEngine {
        fn generate_variants(
            &self,
            word: &str,
            variant_count: usize,
            _quiet: bool,
        ) -> Result<Vec<PhonemeCandidate>, G2pError> {
            if word == "unbekannt" {
                return Ok(Vec::new());
            }
            let all = vec![
                PhonemeCandidate::new(format!("{word}-1"), 0.7),
                PhonemeCandidate::new(format!("{word}-2"), 0.2),
            ];
            Ok(all.into_iter().take(variant_count).collect())
        }
    }

    #[test]
    fn test_default_generate_phoneme_takes_best() {
        let engine = FixedEngine;
        assert_eq!(engine.generate_phoneme("haus").unwrap(), Some("haus-1".to_string()));
        assert_eq!(engine.generate_phoneme("unbekannt").unwrap(), None);
    }

    #[test]
    fn test_default_multi_skips_unknown() {
        let engine = FixedEngine;
        let words = vec!["haus".to_string(), "unbekannt".to_string()];
        let map = engine.generate_phonemes_multi(&words).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["haus"], "haus-1");
    }

    #[test]
    fn test_engine_through_reference() {
        let engine = FixedEngine;
        let by_ref: &dyn G2pEngine = &engine;
        let variants = by_ref.generate_variants("maus", 5, true).unwrap();
        assert_eq!(variants.len(), 2);
    }
}
