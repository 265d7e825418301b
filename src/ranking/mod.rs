//! G2P 신뢰도 기반 검토 대기열 생성
//!
//! 빈도순 어휘의 각 단어를 G2P 엔진에 돌려보고, 엔진이 자신 없어 하는
//! 흔한 단어가 앞에 오도록 정렬한 대기열 파일을 만듭니다.
//!
//! # 사용 예시
//!
//! ```no_run
//! use std::path::Path;
//! use lexedit::g2p::{SequiturConfig, SequiturEngine};
//! use lexedit::ranking::RankingPipeline;
//!
//! let engine = SequiturEngine::new(SequiturConfig::new());
//! let pipeline = RankingPipeline::new(engine);
//! pipeline
//!     .run(Path::new("voc.txt"), Path::new("voc_todo.txt"), Some(1000))
//!     .unwrap();
//! ```

mod pipeline;
mod score;
mod triage;
mod vocabulary;

// 공개 인터페이스
pub use pipeline::{default_jobs, RankingError, RankingPipeline, DEFAULT_VARIANT_COUNT};
pub use score::{fallback_score, priority_score, sort_by_priority, RankedCandidate, FAILURE_PENALTY};
pub use triage::{format_line, read_triage, write_lines, write_triage, TriageError};
pub use vocabulary::{load_vocabulary, read_vocabulary, VocabularyEntry, VocabularyError};
