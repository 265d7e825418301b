//! G2P(grapheme-to-phoneme) 클라이언트 어댑터
//!
//! 외부 G2P 엔진을 호출해 단어의 발음 후보를 얻습니다.
//!
//! # 개요
//!
//! - [`G2pEngine`]: 단어 → 발음 후보 변환 인터페이스
//! - [`SequiturEngine`]: Sequitur `g2p.py`를 서브프로세스로 실행하는 구현
//! - [`SequiturConfig`]: 엔진 명령, 모델 경로, 제한 시간 설정
//!
//! # 사용 예시
//!
//! ```no_run
//! use lexedit::g2p::{G2pEngine, SequiturConfig, SequiturEngine};
//!
//! let engine = SequiturEngine::new(
//!     SequiturConfig::new().with_model_path("dicts/de_g2p_model-6"),
//! );
//! let variants = engine.generate_variants("haus", 3, true).unwrap();
//! for v in variants {
//!     println!("{} {}", v.probability, v.transcription);
//! }
//! ```
//!
//! 엔진이 단어에 대한 줄을 하나도 내지 않으면 빈 목록을 반환합니다.
//! 호출자는 빈 결과를 "모르는 단어"로 처리해야 합니다.

mod config;
mod engine;
pub mod parser;
mod sequitur;

// 공개 인터페이스
pub use config::SequiturConfig;
pub use engine::{G2pEngine, G2pError, PhonemeCandidate};
pub use sequitur::SequiturEngine;
