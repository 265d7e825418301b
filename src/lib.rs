pub mod config;
pub mod g2p;
pub mod lexicon;
pub mod persistence;
pub mod ranking;

pub use g2p::{G2pEngine, PhonemeCandidate, SequiturConfig, SequiturEngine};
pub use lexicon::{Lexicon, LexiconEntry};
pub use ranking::{RankedCandidate, RankingPipeline, VocabularyEntry};
