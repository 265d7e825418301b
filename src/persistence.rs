//! 원자적 파일 쓰기
//!
//! 대상 디렉토리에 임시 파일을 만들어 내용을 모두 쓴 뒤 이름을 바꿉니다.
//! 중간에 중단되어도 반쯤 쓰인 파일이 남지 않습니다.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// 파일이 놓일 디렉토리 (상대 파일명이면 현재 디렉토리)
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn prepare<F>(path: &Path, write: F) -> io::Result<NamedTempFile>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let temp_file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }
    temp_file.as_file().sync_all()?;
    Ok(temp_file)
}

/// 기존 파일을 덮어쓰며 원자적으로 저장
pub fn write_atomically<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let temp_file = prepare(path, write)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// 새 파일로만 저장 (이미 있으면 `AlreadyExists`)
pub fn write_new<F>(path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let temp_file = prepare(path, write)?;
    temp_file.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(())
}
