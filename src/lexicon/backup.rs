//! 사전 백업
//!
//! 생성 시각이 들어간 이름으로 사전 전체를 복사해 둡니다.
//! 백업은 한 번만 쓰이며 덮어쓰거나 자동으로 지우지 않습니다.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use super::store::{Lexicon, LexiconError};
use crate::persistence::write_new;

/// 백업 파일 이름 형식
const BACKUP_NAME_FORMAT: &str = "backup_%Y_%m_%d____%H_%M_%S.dict";

/// 시각에 해당하는 백업 파일 이름
pub fn backup_file_name(now: NaiveDateTime) -> String {
    now.format(BACKUP_NAME_FORMAT).to_string()
}

/// `dir` 아래에 백업 생성, 만든 파일 경로 반환
pub fn backup(lexicon: &Lexicon, dir: &Path, now: NaiveDateTime) -> Result<PathBuf, LexiconError> {
    let path = dir.join(backup_file_name(now));

    write_new(&path, |writer| lexicon.write_to(writer)).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            LexiconError::BackupExists(path.clone())
        } else {
            LexiconError::io(&path, e)
        }
    })?;

    log::info!("백업 저장: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::LexiconEntry;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(backup_file_name(at(13, 7, 9)), "backup_2019_05_04____13_07_09.dict");
    }

    #[test]
    fn test_backup_writes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let backups = dir.path().join("dicts");
        let lexicon = Lexicon::from_entries(vec![LexiconEntry::new("haus", "h aU s").unwrap()]);

        let path = backup(&lexicon, &backups, at(8, 0, 0)).unwrap();

        assert_eq!(path, backups.join("backup_2019_05_04____08_00_00.dict"));
        assert_eq!(Lexicon::load(&path).unwrap(), lexicon);
    }

    #[test]
    fn test_backup_is_write_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = Lexicon::from_entries(vec![LexiconEntry::new("a", "1").unwrap()]);
        let second = Lexicon::from_entries(vec![LexiconEntry::new("b", "2").unwrap()]);

        let path = backup(&first, dir.path(), at(9, 30, 0)).unwrap();
        let err = backup(&second, dir.path(), at(9, 30, 0)).unwrap_err();

        assert!(matches!(err, LexiconError::BackupExists(_)));
        assert_eq!(Lexicon::load(&path).unwrap(), first);
    }
}
