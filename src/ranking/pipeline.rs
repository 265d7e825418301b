//! 후보 순위 파이프라인
//!
//! 어휘 → (단어별 G2P 호출, 병렬) → 점수 → 정렬 → 대기열 파일.
//!
//! 단어끼리는 의존성이 없으므로 작업자 스레드들이 공유 커서에서 다음 단어를
//! 가져가 처리하고, 결과는 입력 순번과 함께 채널로 모읍니다.
//! 정렬과 파일 쓰기는 단일 스레드에서 마지막에 한 번만 합니다.

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use thiserror::Error;

use super::score::{sort_by_priority, RankedCandidate};
use super::triage::{write_triage, TriageError};
use super::vocabulary::{load_vocabulary, VocabularyEntry, VocabularyError};
use crate::g2p::G2pEngine;

/// 점수 계산에 요청하는 변이형 수
pub const DEFAULT_VARIANT_COUNT: usize = 3;

/// 진행 상황 로그 간격 (단어 수)
const PROGRESS_INTERVAL: usize = 100;

/// 파이프라인 에러
#[derive(Debug, Error)]
pub enum RankingError {
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
    #[error(transparent)]
    Triage(#[from] TriageError),
}

/// 사용 가능한 코어 수 (알 수 없으면 1)
pub fn default_jobs() -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// G2P 신뢰도 기반 순위 파이프라인
pub struct RankingPipeline<E: G2pEngine> {
    engine: E,
    variant_count: usize,
    jobs: usize,
}

impl<E: G2pEngine> RankingPipeline<E> {
    /// 기본 설정 (변이형 3개, 코어 수만큼 작업자)
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            variant_count: DEFAULT_VARIANT_COUNT,
            jobs: default_jobs(),
        }
    }

    /// 작업자 수 설정 (최소 1)
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// 요청 변이형 수 설정 (최소 1)
    pub fn with_variant_count(mut self, variant_count: usize) -> Self {
        self.variant_count = variant_count.max(1);
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 단어 하나 점수 계산
    ///
    /// 엔진 에러, 빈 결과, [0, 1] 밖의 확률(NaN 포함)은 재시도 없이
    /// 실패 점수로 대체합니다.
    fn score_entry(&self, index: usize, entry: &VocabularyEntry) -> RankedCandidate {
        let result = self
            .engine
            .generate_variants(&entry.word, self.variant_count, true);

        let best = match result {
            Ok(candidates) => candidates.into_iter().next(),
            Err(e) => {
                log::warn!("자동 변환 실패: {} ({})", entry.word, e);
                return RankedCandidate::failed(&entry.word, entry.occurrence_count);
            }
        };

        let Some(best) = best else {
            log::warn!("자동 변환 실패: {} (결과 없음)", entry.word);
            return RankedCandidate::failed(&entry.word, entry.occurrence_count);
        };

        if !(0.0..=1.0).contains(&best.probability) {
            log::warn!("자동 변환 실패: {} (잘못된 확률 {})", entry.word, best.probability);
            return RankedCandidate::failed(&entry.word, entry.occurrence_count);
        }

        if index % PROGRESS_INTERVAL == 0 {
            log::info!("진행 중: {} {} {}", entry.word, best.probability, best.transcription);
        }

        RankedCandidate::scored(&entry.word, best.probability, entry.occurrence_count)
    }

    /// 어휘 전체 점수 계산 후 우선순위 순으로 반환
    pub fn rank(&self, entries: &[VocabularyEntry]) -> Vec<RankedCandidate> {
        let workers = self.jobs.min(entries.len()).max(1);
        let cursor = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<(usize, RankedCandidate)>();

        thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let cursor = &cursor;
                scope.spawn(move || loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(entry) = entries.get(index) else {
                        break;
                    };
                    let ranked = self.score_entry(index, entry);
                    if tx.send((index, ranked)).is_err() {
                        break;
                    }
                });
            }
        });
        drop(tx);

        let mut indexed: Vec<(usize, RankedCandidate)> = rx.into_iter().collect();
        // 동점 시 입력 순서를 지키기 위해 먼저 입력 순서로 되돌림
        indexed.sort_by_key(|(index, _)| *index);

        let mut ranked: Vec<RankedCandidate> = indexed.into_iter().map(|(_, c)| c).collect();
        sort_by_priority(&mut ranked);
        ranked
    }

    /// 어휘 파일 → 대기열 파일
    pub fn run(
        &self,
        vocabulary_path: &Path,
        output_path: &Path,
        cutoff: Option<usize>,
    ) -> Result<Vec<RankedCandidate>, RankingError> {
        let entries = load_vocabulary(vocabulary_path, cutoff)?;
        log::info!(
            "G2P 신뢰도 계산 시작: {}개 단어, 작업자 {}개",
            entries.len(),
            self.jobs.min(entries.len()).max(1)
        );

        let ranked = self.rank(&entries);

        log::info!("정렬 완료, 저장 중...");
        write_triage(output_path, &ranked)?;
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::g2p::{G2pError, PhonemeCandidate};
    use std::collections::HashMap;

    /// 단어별 고정 확률을 돌려주는 엔진 (목록에 없으면 실패)
    struct StubEngine {
        probabilities: HashMap<String, f64>,
        calls: AtomicUsize,
    }

    impl StubEngine {
        fn new(pairs: &[(&str, f64)]) -> Self {
            Self {
                probabilities: pairs.iter().map(|(w, p)| (w.to_string(), *p)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl G2pEngine for StubEngine {
        fn generate_variants(
            &self,
            word: &str,
            variant_count: usize,
            _quiet: bool,
        ) -> Result<Vec<PhonemeCandidate>, G2pError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert_eq!(variant_count, DEFAULT_VARIANT_COUNT);
            match self.probabilities.get(word) {
                Some(&p) => Ok(vec![
                    PhonemeCandidate::new(format!("/{word}/"), p),
                    PhonemeCandidate::new(format!("/{word}2/"), (1.0 - p) / 2.0),
                ]),
                None if word.starts_with("leer") => Ok(Vec::new()),
                None => Err(G2pError::InvalidRequest(format!("unbekannt: {word}"))),
            }
        }
    }

    fn words(list: &[RankedCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.word.as_str()).collect()
    }

    #[test]
    fn test_scenario_haus_and_unknown() {
        let engine = StubEngine::new(&[("haus", 0.95)]);
        let pipeline = RankingPipeline::new(&engine).with_jobs(2);
        let vocab = vec![VocabularyEntry::new("haus", 500), VocabularyEntry::new("xyzzyplonk", 2)];

        let ranked = pipeline.rank(&vocab);

        assert_eq!(words(&ranked), vec!["haus", "xyzzyplonk"]);
        assert!((ranked[0].priority_score - 0.05 * 500f64.log10()).abs() < 1e-9);
        assert_eq!(ranked[0].top_probability, 0.95);
        assert_eq!(ranked[1].priority_score, -20.0);
        assert!(ranked[1].top_probability.is_nan());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_result_uses_fallback() {
        let engine = StubEngine::new(&[]);
        let pipeline = RankingPipeline::new(&engine).with_jobs(1);
        let ranked = pipeline.rank(&[VocabularyEntry::new("leerwort", 7)]);
        assert_eq!(ranked[0].priority_score, -70.0);
        assert!(ranked[0].is_failure());
    }

    #[test]
    fn test_every_word_scored_once_with_many_workers() {
        let pairs: Vec<(String, f64)> = (0..250).map(|i| (format!("w{i}"), (i % 10) as f64 / 10.0)).collect();
        let refs: Vec<(&str, f64)> = pairs.iter().map(|(w, p)| (w.as_str(), *p)).collect();
        let engine = StubEngine::new(&refs);
        let vocab: Vec<VocabularyEntry> = (0..250).map(|i| VocabularyEntry::new(format!("w{i}"), 1000 - i)).collect();

        let ranked = RankingPipeline::new(&engine).with_jobs(8).rank(&vocab);

        assert_eq!(ranked.len(), 250);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 250);
        for pair in ranked.windows(2) {
            assert!(pair[0].priority_score >= pair[1].priority_score);
        }
    }

    #[test]
    fn test_ties_keep_vocabulary_order_across_workers() {
        let engine = StubEngine::new(&[("a", 0.5), ("b", 0.5), ("c", 0.5), ("d", 0.5), ("top", 0.0)]);
        let vocab = vec![
            VocabularyEntry::new("a", 100),
            VocabularyEntry::new("b", 100),
            VocabularyEntry::new("top", 100),
            VocabularyEntry::new("c", 100),
            VocabularyEntry::new("d", 100),
        ];

        for jobs in [1, 2, 5] {
            let ranked = RankingPipeline::new(&engine).with_jobs(jobs).rank(&vocab);
            assert_eq!(words(&ranked), vec!["top", "a", "b", "c", "d"]);
        }
    }

    #[test]
    fn test_invalid_probability_counts_as_failure() {
        let mut pairs: Vec<(String, f64)> = (0..60).map(|i| (format!("w{i}"), 0.5)).collect();
        pairs.push(("nan".to_string(), f64::NAN));
        pairs.push(("zu_gross".to_string(), 1.5));
        let refs: Vec<(&str, f64)> = pairs.iter().map(|(w, p)| (w.as_str(), *p)).collect();
        let engine = StubEngine::new(&refs);
        let mut vocab: Vec<VocabularyEntry> = (0..60).map(|i| VocabularyEntry::new(format!("w{i}"), 100 + i)).collect();
        vocab.insert(30, VocabularyEntry::new("nan", 5000));
        vocab.insert(10, VocabularyEntry::new("zu_gross", 3));

        let ranked = RankingPipeline::new(&engine).with_jobs(1).rank(&vocab);

        assert_eq!(ranked.len(), 62);
        assert_eq!(words(&ranked[60..]), vec!["zu_gross", "nan"]);
        assert!(ranked[60..].iter().all(RankedCandidate::is_failure));
        assert_eq!(ranked[61].priority_score, -50_000.0);
        for pair in ranked.windows(2) {
            assert!(pair[0].priority_score >= pair[1].priority_score);
        }
    }

    #[test]
    fn test_empty_vocabulary() {
        let engine = StubEngine::new(&[]);
        assert!(RankingPipeline::new(&engine).rank(&[]).is_empty());
    }

    #[test]
    fn test_builder_clamps_to_one() {
        let engine = StubEngine::new(&[]);
        let pipeline = RankingPipeline::new(&engine).with_jobs(0);
        assert_eq!(pipeline.jobs(), 1);
    }
}
