//! 설정 파일 로드/저장 (JSON)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::g2p::SequiturConfig;

/// 기본 설정 파일 경로 (작업 디렉토리 기준)
pub const DEFAULT_CONFIG_PATH: &str = "lexedit.json";

/// 설정 저장 에러
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("설정 디렉토리 생성 실패: {0}")]
    CreateDir(#[source] std::io::Error),
    #[error("직렬화 실패: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("설정 파일 저장 실패: {0}")]
    Write(#[source] std::io::Error),
}

/// lexedit 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// G2P 엔진 실행 명령
    #[serde(default = "default_g2p_command")]
    pub g2p_command: String,
    /// 엔진 인자 앞에 붙는 추가 인자
    #[serde(default)]
    pub g2p_args: Vec<String>,
    /// G2P 모델 경로
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// 엔진 호출 제한 시간 (초, 0이면 무제한)
    #[serde(default = "default_g2p_timeout_secs")]
    pub g2p_timeout_secs: u64,
    /// 빈도순 어휘 파일
    #[serde(default = "default_vocabulary_path")]
    pub vocabulary_path: PathBuf,
    /// 검토 대기열 출력 파일
    #[serde(default = "default_triage_path")]
    pub triage_path: PathBuf,
    /// 발음 사전 파일
    #[serde(default = "default_lexicon_path")]
    pub lexicon_path: PathBuf,
    /// 백업 디렉토리
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    /// 발음 후보 요청 수
    #[serde(default = "default_num_variants")]
    pub num_variants: usize,
    /// 어휘 최대 항목 수 (null이면 전체)
    #[serde(default = "default_cutoff")]
    pub cutoff: Option<usize>,
    /// 작업자 스레드 수 (null이면 코어 수)
    #[serde(default)]
    pub jobs: Option<usize>,
    /// 항목 추가/삭제 때마다 사전 저장
    #[serde(default = "default_auto_save")]
    pub auto_save: bool,
}

fn default_g2p_command() -> String {
    "g2p.py".to_string()
}

fn default_model_path() -> PathBuf {
    PathBuf::from("dicts/de_g2p_model-6")
}

fn default_g2p_timeout_secs() -> u64 {
    60
}

fn default_vocabulary_path() -> PathBuf {
    PathBuf::from("voc.txt")
}

fn default_triage_path() -> PathBuf {
    PathBuf::from("voc_todo.txt")
}

fn default_lexicon_path() -> PathBuf {
    PathBuf::from("output_lexicon.txt")
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("dicts")
}

fn default_num_variants() -> usize {
    3
}

fn default_cutoff() -> Option<usize> {
    Some(1000)
}

fn default_auto_save() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            g2p_command: default_g2p_command(),
            g2p_args: Vec::new(),
            model_path: default_model_path(),
            g2p_timeout_secs: default_g2p_timeout_secs(),
            vocabulary_path: default_vocabulary_path(),
            triage_path: default_triage_path(),
            lexicon_path: default_lexicon_path(),
            backup_dir: default_backup_dir(),
            num_variants: default_num_variants(),
            cutoff: default_cutoff(),
            jobs: None,
            auto_save: default_auto_save(),
        }
    }
}

impl AppConfig {
    /// G2P 엔진 설정으로 변환
    pub fn sequitur_config(&self) -> SequiturConfig {
        let timeout = (self.g2p_timeout_secs > 0).then(|| Duration::from_secs(self.g2p_timeout_secs));
        SequiturConfig::new()
            .with_command(self.g2p_command.clone())
            .with_args(self.g2p_args.iter().cloned())
            .with_model_path(self.model_path.clone())
            .with_timeout(timeout)
    }
}

/// 설정 파일 로드 (파일 없거나 파싱 실패 시 기본값)
pub fn load_config(path: &Path) -> AppConfig {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("설정 파일 파싱 실패, 기본값 사용 ({}): {}", path.display(), e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// 설정 파일 저장
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ConfigError::CreateDir)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).map_err(ConfigError::Write)?;
    Ok(())
}
