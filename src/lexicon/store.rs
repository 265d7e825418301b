//! 발음 사전 파일
//!
//! 한 줄에 `단어 음소열`. 첫 공백에서만 나누며, 나머지 음소열은
//! 공백이나 ` | ` 구분자를 포함할 수 있는 불투명 문자열로 보존합니다.
//! 같은 단어가 여러 번 나와도 막지 않습니다.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::persistence::write_atomically;

/// 여러 발음을 한 항목에 담을 때 쓰는 구분자
pub const ALTERNATIVE_SEPARATOR: &str = " | ";

/// 사전 파일 에러
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("사전 파일 입출력 오류 ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// 같은 이름의 백업이 이미 있음 (백업은 덮어쓰지 않음)
    #[error("백업 파일이 이미 존재합니다: {0}")]
    BackupExists(PathBuf),
    #[error("잘못된 사전 항목: {0}")]
    InvalidEntry(String),
}

impl LexiconError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        LexiconError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// 사전 항목
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LexiconEntry {
    pub word: String,
    pub phonemes: String,
}

impl LexiconEntry {
    /// 새 항목 (단어는 비어 있거나 공백을 포함할 수 없음)
    pub fn new(word: impl Into<String>, phonemes: impl Into<String>) -> Result<Self, LexiconError> {
        let word = word.into();
        if word.is_empty() || word.chars().any(char::is_whitespace) {
            return Err(LexiconError::InvalidEntry(word));
        }
        Ok(Self {
            word,
            phonemes: phonemes.into(),
        })
    }

    /// 여러 발음을 구분자로 이어 붙인 항목
    pub fn with_alternatives<I, S>(word: impl Into<String>, alternatives: I) -> Result<Self, LexiconError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = alternatives
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(ALTERNATIVE_SEPARATOR);
        Self::new(word, joined)
    }

    /// 파일 한 줄 파싱 (빈 줄은 None)
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            return None;
        }
        let (word, phonemes) = line.split_once(' ').unwrap_or((line, ""));
        Some(Self {
            word: word.to_string(),
            phonemes: phonemes.to_string(),
        })
    }

    /// 파일 한 줄로 (줄바꿈 제외)
    pub fn to_line(&self) -> String {
        format!("{} {}", self.word, self.phonemes)
    }
}

/// 발음 사전 (파일 순서를 유지하는 항목 목록)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<LexiconEntry>) -> Self {
        Self { entries }
    }

    /// 리더에서 로드
    pub fn read_from<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut entries = Vec::new();
        for line in reader.lines() {
            if let Some(entry) = LexiconEntry::parse_line(&line?) {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    /// 파일에서 로드 (파일이 없으면 빈 사전)
    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("사전 파일이 없어 빈 사전으로 시작합니다: {}", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(LexiconError::io(path, e)),
        };

        let lexicon = Self::read_from(BufReader::new(file)).map_err(|e| LexiconError::io(path, e))?;
        log::info!("사전 로드: {} ({}개 항목)", path.display(), lexicon.len());
        Ok(lexicon)
    }

    /// 라이터에 기록
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        for entry in &self.entries {
            writeln!(writer, "{}", entry.to_line())?;
        }
        Ok(())
    }

    /// 파일 전체를 새로 씀
    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        write_atomically(path, |writer| self.write_to(writer)).map_err(|e| LexiconError::io(path, e))?;
        log::info!("사전 저장: {} ({}개 항목)", path.display(), self.len());
        Ok(())
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&LexiconEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LexiconEntry> {
        self.entries.iter()
    }

    /// 끝에 추가 (중복 허용)
    pub fn push(&mut self, entry: LexiconEntry) {
        self.entries.push(entry);
    }

    /// 위치로 삭제
    pub fn remove(&mut self, index: usize) -> Option<LexiconEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// 단어로 삭제 (첫 번째 일치 항목)
    pub fn remove_word(&mut self, word: &str) -> Option<LexiconEntry> {
        let index = self.entries.iter().position(|e| e.word == word)?;
        self.remove(index)
    }

    /// 대소문자 무시 검색, 첫 일치 위치 반환
    ///
    /// `^`로 시작하면 완전 일치, 아니면 부분 문자열 일치.
    pub fn search(&self, query: &str) -> Option<usize> {
        search_words(self.entries.iter().map(|e| e.word.as_str()), query)
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a LexiconEntry;
    type IntoIter = std::slice::Iter<'a, LexiconEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 단어 목록 검색 (사전과 대기열 목록에 공통)
pub fn search_words<'a, I>(words: I, query: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let (exact, needle) = match query.strip_prefix('^') {
        Some(rest) => (true, rest.to_lowercase()),
        None => (false, query.to_lowercase()),
    };
    if needle.is_empty() {
        return None;
    }

    words.into_iter().position(|word| {
        let word = word.to_lowercase();
        if exact {
            word == needle
        } else {
            word.contains(&needle)
        }
    })
}

/// 사전 파일 + 자동 저장 정책
///
/// `auto_save`가 켜져 있으면 항목을 추가/삭제할 때마다 파일 전체를 다시 씁니다.
/// 꺼져 있으면 [`LexiconFile::flush`]를 부를 때 한 번에 씁니다.
#[derive(Debug)]
pub struct LexiconFile {
    path: PathBuf,
    lexicon: Lexicon,
    auto_save: bool,
    dirty: bool,
}

impl LexiconFile {
    pub fn open(path: impl Into<PathBuf>, auto_save: bool) -> Result<Self, LexiconError> {
        let path = path.into();
        let lexicon = Lexicon::load(&path)?;
        Ok(Self {
            path,
            lexicon,
            auto_save,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn changed(&mut self) -> Result<(), LexiconError> {
        self.dirty = true;
        if self.auto_save {
            self.save()?;
        }
        Ok(())
    }

    /// 항목 추가
    pub fn add(&mut self, entry: LexiconEntry) -> Result<(), LexiconError> {
        log::info!("항목 추가: {}", entry.to_line());
        self.lexicon.push(entry);
        self.changed()
    }

    /// 단어 삭제 (없으면 Ok(None))
    pub fn remove_word(&mut self, word: &str) -> Result<Option<LexiconEntry>, LexiconError> {
        let removed = self.lexicon.remove_word(word);
        if removed.is_some() {
            log::info!("항목 삭제: {}", word);
            self.changed()?;
        }
        Ok(removed)
    }

    /// 즉시 저장
    pub fn save(&mut self) -> Result<(), LexiconError> {
        self.lexicon.save(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    /// 저장되지 않은 변경이 있으면 저장
    pub fn flush(&mut self) -> Result<(), LexiconError> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
