//! Sequitur G2P 엔진 호출 설정
//!
//! 전역 상수 대신 생성자에 넘기는 설정 구조체입니다.
//! 모델이 다른 엔진 여러 개를 한 프로세스에서 함께 쓸 수 있습니다.

use std::path::PathBuf;
use std::time::Duration;

/// Sequitur 엔진 설정
#[derive(Debug, Clone)]
pub struct SequiturConfig {
    /// 실행할 명령 (기본: `g2p.py`)
    pub command: String,

    /// 엔진 인자 앞에 붙는 추가 인자
    /// 예: `command = "python3"`, `args = ["/opt/sequitur/g2p.py"]`
    pub args: Vec<String>,

    /// G2P 모델 파일 경로
    pub model_path: PathBuf,

    /// `--encoding` 값
    pub encoding: String,

    /// 엔진 호출 제한 시간 (None이면 무제한)
    pub timeout: Option<Duration>,
}

impl Default for SequiturConfig {
    fn default() -> Self {
        Self {
            command: "g2p.py".to_string(),
            args: Vec::new(),
            model_path: PathBuf::from("dicts/de_g2p_model-6"),
            encoding: "UTF8".to_string(),
            timeout: Some(Duration::from_secs(60)),
        }
    }
}

impl SequiturConfig {
    /// 새 설정 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 실행 명령 설정
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// 앞쪽 추가 인자 설정
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// 모델 경로 설정
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    /// 제한 시간 설정
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// 엔진에 넘길 전체 인자 목록
    ///
    /// `variants`가 Some이면 `--variants-number`를 포함합니다.
    pub(crate) fn engine_args(&self, variants: Option<usize>, input: &std::path::Path) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(format!("--encoding={}", self.encoding));
        if let Some(n) = variants {
            args.push(format!("--variants-number={}", n));
        }
        args.push("--model".to_string());
        args.push(self.model_path.to_string_lossy().into_owned());
        args.push("--apply".to_string());
        args.push(input.to_string_lossy().into_owned());
        args
    }
}
