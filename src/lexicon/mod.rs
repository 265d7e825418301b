//! 발음 사전 저장소
//!
//! 단어 → 음소열 사전 파일, 시각이 붙은 백업, 검토용 단어 목록을 다룹니다.
//!
//! # 사용 예시
//!
//! ```
//! use lexedit::lexicon::{Lexicon, LexiconEntry};
//!
//! let mut lexicon = Lexicon::new();
//! lexicon.push(LexiconEntry::new("haus", "h aU s").unwrap());
//! lexicon.push(LexiconEntry::with_alternatives("chemie", ["C e m i:", "k e m i:"]).unwrap());
//!
//! assert_eq!(lexicon.search("CHEM"), Some(1));
//! assert_eq!(lexicon.search("^hau"), None);
//! assert_eq!(lexicon.get(1).unwrap().to_line(), "chemie C e m i: | k e m i:");
//! ```

mod backup;
mod store;
mod wordlist;

// 공개 인터페이스
pub use backup::{backup, backup_file_name};
pub use store::{search_words, Lexicon, LexiconEntry, LexiconError, LexiconFile, ALTERNATIVE_SEPARATOR};
pub use wordlist::read_wordlist;
