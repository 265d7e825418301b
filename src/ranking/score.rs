//! 우선순위 점수
//!
//! 자신 없는 단어 + 자주 나오는 단어 ⇒ 높은 우선순위.
//!
//! `priority = (1 - p) * log10(occurrence_count)`
//!
//! log10으로 빈도 범위를 눌러서 신뢰도 부족이 주 신호가 되고,
//! 빈도는 동점을 가르고 아주 흔한 단어를 끌어올리는 역할만 합니다.

/// 엔진 실패 시 출현횟수에 곱하는 값
pub const FAILURE_PENALTY: f64 = -10.0;

/// 검토 대기열의 한 항목
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub word: String,
    pub priority_score: f64,
    /// 엔진 실패 시 NaN
    pub top_probability: f64,
    pub occurrence_count: u64,
}

impl RankedCandidate {
    /// 엔진이 최선 후보를 돌려준 경우
    pub fn scored(word: impl Into<String>, top_probability: f64, occurrence_count: u64) -> Self {
        Self {
            word: word.into(),
            priority_score: priority_score(top_probability, occurrence_count),
            top_probability,
            occurrence_count,
        }
    }

    /// 엔진이 실패한 경우: 대기열 맨 아래로
    pub fn failed(word: impl Into<String>, occurrence_count: u64) -> Self {
        Self {
            word: word.into(),
            priority_score: fallback_score(occurrence_count),
            top_probability: f64::NAN,
            occurrence_count,
        }
    }

    /// 엔진 실패로 만들어진 항목인지
    pub fn is_failure(&self) -> bool {
        self.top_probability.is_nan()
    }
}

/// 정상 점수
///
/// 출현횟수 0은 1로 취급합니다 (log10(0) = -inf 방지).
pub fn priority_score(top_probability: f64, occurrence_count: u64) -> f64 {
    let occurrences = occurrence_count.max(1) as f64;
    (1.0 - top_probability) * occurrences.log10()
}

/// 실패 점수
pub fn fallback_score(occurrence_count: u64) -> f64 {
    occurrence_count as f64 * FAILURE_PENALTY
}

/// 점수 내림차순 정렬 (동점은 입력 순서 유지)
///
/// `total_cmp`는 -0.0을 0.0보다 아래에 둡니다. 출현횟수 0인 실패 항목(-0.0)도
/// 정상 점수 0.0 항목보다 아래로 내려갑니다.
pub fn sort_by_priority(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_formula() {
        let score = priority_score(0.95, 500);
        assert!((score - 0.05 * 500f64.log10()).abs() < 1e-12);
        assert!((score - 0.1349).abs() < 1e-3);
    }

    #[test]
    fn test_confident_word_scores_zero() {
        assert_eq!(priority_score(1.0, 100_000), 0.0);
    }

    #[test]
    fn test_single_occurrence_scores_zero() {
        assert_eq!(priority_score(0.1, 1), 0.0);
        assert_eq!(priority_score(0.1, 0), 0.0);
    }

    #[test]
    fn test_score_is_finite_in_domain() {
        for &p in &[0.0, 0.25, 0.5, 1.0] {
            for &occ in &[1u64, 2, 10, 1_000_000, u64::MAX] {
                assert!(priority_score(p, occ).is_finite());
            }
        }
    }

    #[test]
    fn test_frequent_uncertain_words_rank_higher() {
        assert!(priority_score(0.3, 10_000) > priority_score(0.3, 10));
        assert!(priority_score(0.3, 1_000) > priority_score(0.9, 1_000));
    }

    #[test]
    fn test_failed_candidate() {
        let failed = RankedCandidate::failed("xyzzyplonk", 2);
        assert_eq!(failed.priority_score, -20.0);
        assert!(failed.top_probability.is_nan());
        assert!(failed.is_failure());
        assert!(!RankedCandidate::scored("haus", 0.5, 10).is_failure());
    }

    #[test]
    fn test_failures_sink_below_scored() {
        let mut list = vec![
            RankedCandidate::failed("kaputt", 1),
            RankedCandidate::scored("sicher", 1.0, 5),
            RankedCandidate::scored("unsicher", 0.2, 5000),
        ];
        sort_by_priority(&mut list);
        let words: Vec<&str> = list.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["unsicher", "sicher", "kaputt"]);
    }

    #[test]
    fn test_zero_count_failure_sinks_below_zero_score() {
        let mut list = vec![
            RankedCandidate::failed("x", 0),
            RankedCandidate::scored("y", 0.5, 1),
            RankedCandidate::scored("z", 1.0, 40),
        ];
        sort_by_priority(&mut list);
        let words: Vec<&str> = list.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["y", "z", "x"]);
        assert!(list[2].is_failure());
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut list = vec![
            RankedCandidate::scored("erste", 0.5, 100),
            RankedCandidate::scored("oben", 0.0, 1000),
            RankedCandidate::scored("zweite", 0.5, 100),
            RankedCandidate::scored("dritte", 0.5, 100),
        ];
        sort_by_priority(&mut list);
        let words: Vec<&str> = list.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(words, vec!["oben", "erste", "zweite", "dritte"]);
    }
}
