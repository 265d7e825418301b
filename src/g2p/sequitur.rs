//! Sequitur G2P 서브프로세스 백엔드
//!
//! 단어를 임시 입력 파일에 쓰고 `g2p.py --apply <파일>`을 실행한 뒤
//! 표준 출력을 파싱합니다. 임시 파일은 성공/실패와 관계없이 삭제됩니다.

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;

use super::config::SequiturConfig;
use super::engine::{G2pEngine, G2pError, PhonemeCandidate};
use super::parser::{normalize_word, parse_multi_output, parse_single_output, parse_variant_output};

/// 종료 확인 주기
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// 엔진 한 번 실행 결과
struct EngineOutput {
    stdout: String,
    status: ExitStatus,
}

/// Sequitur 기반 G2P 엔진
#[derive(Debug, Clone)]
pub struct SequiturEngine {
    config: SequiturConfig,
}

impl SequiturEngine {
    pub fn new(config: SequiturConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SequiturConfig {
        &self.config
    }

    /// 단어 목록을 임시 파일에 쓰고 엔진 실행
    fn run(&self, words: &[&str], variants: Option<usize>) -> Result<EngineOutput, G2pError> {
        let mut input = NamedTempFile::new()?;
        for word in words {
            writeln!(input, "{}", word)?;
        }
        input.flush()?;

        let args = self.config.engine_args(variants, input.path());
        log::debug!("{} {}", self.config.command, args.join(" "));

        let child = Command::new(&self.config.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| G2pError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        let output = wait_with_timeout(child, self.config.timeout)?;
        if !output.status.success() {
            log::warn!("G2P 엔진 비정상 종료: {}", output.status);
        }
        // input은 여기서 drop되며 임시 파일 삭제
        Ok(output)
    }
}

/// 자식 프로세스 출력을 모으며 제한 시간까지 대기
///
/// 제한 시간을 넘기면 프로세스를 종료하고 `G2pError::Timeout`을 반환합니다.
/// 엔진이 띄운 손자 프로세스가 파이프를 붙잡고 있어도 출력 수집은
/// 같은 제한 시간 안에서 끝납니다.
fn wait_with_timeout(mut child: Child, timeout: Option<Duration>) -> Result<EngineOutput, G2pError> {
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let deadline = timeout.map(|limit| (Instant::now() + limit, limit));
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if let Some((at, limit)) = deadline {
            if Instant::now() >= at {
                // 이미 종료된 경우 kill 실패는 무시
                let _ = child.kill();
                let _ = child.wait();
                return Err(G2pError::Timeout(limit));
            }
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = collect_reader(stdout_reader, deadline)?;
    let stderr = collect_reader(stderr_reader, deadline)?;
    for line in stderr.lines() {
        log::debug!("[g2p stderr] {}", line);
    }

    Ok(EngineOutput { stdout, status })
}

/// 파이프를 끝까지 읽는 스레드 (파이프 버퍼가 차서 멈추지 않도록)
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> mpsc::Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            log::warn!("G2P 출력 읽기 실패: {}", e);
        }
        // 제한 시간이 지나 수신 측이 사라졌으면 버림
        let _ = tx.send(buf);
    });
    rx
}

/// 읽기 스레드 결과 수신 (제한 시간이 있으면 남은 시간까지만)
fn collect_reader(
    reader: Option<mpsc::Receiver<Vec<u8>>>,
    deadline: Option<(Instant, Duration)>,
) -> Result<String, G2pError> {
    let Some(rx) = reader else {
        return Ok(String::new());
    };

    let bytes = match deadline {
        Some((at, limit)) => match rx.recv_timeout(at.saturating_duration_since(Instant::now())) {
            Ok(bytes) => bytes,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                log::warn!("G2P 엔진 종료 후에도 출력 파이프가 닫히지 않음");
                return Err(G2pError::Timeout(limit));
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Vec::new(),
        },
        None => rx.recv().unwrap_or_default(),
    };

    // 잘못된 UTF-8은 무시
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl G2pEngine for SequiturEngine {
    fn generate_variants(
        &self,
        word: &str,
        variant_count: usize,
        quiet: bool,
    ) -> Result<Vec<PhonemeCandidate>, G2pError> {
        if variant_count == 0 {
            return Err(G2pError::InvalidRequest("variant_count는 1 이상이어야 합니다".into()));
        }
        let word = normalize_word(word);
        if word.trim().is_empty() {
            return Err(G2pError::InvalidRequest("빈 단어".into()));
        }

        let output = self.run(&[word.as_str()], Some(variant_count))?;
        for line in output.stdout.lines() {
            if quiet {
                log::debug!("{}", line);
            } else {
                log::info!("{}", line);
            }
        }

        Ok(parse_variant_output(&output.stdout, &word, variant_count))
    }

    fn generate_phoneme(&self, word: &str) -> Result<Option<String>, G2pError> {
        if word.trim().is_empty() {
            return Err(G2pError::InvalidRequest("빈 단어".into()));
        }
        let output = self.run(&[word], None)?;
        Ok(parse_single_output(&output.stdout, word))
    }

    fn generate_phonemes_multi(&self, words: &[String]) -> Result<HashMap<String, String>, G2pError> {
        let words: Vec<&str> = words
            .iter()
            .map(String::as_str)
            .filter(|w| !w.trim().is_empty())
            .collect();
        if words.is_empty() {
            return Ok(HashMap::new());
        }

        let output = self.run(&words, None)?;
        let word_set: HashSet<&str> = words.iter().copied().collect();
        Ok(parse_multi_output(&output.stdout, &word_set))
    }
}
