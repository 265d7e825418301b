//! lexedit - 발음 사전 구축 도구

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;

use lexedit::config::{load_config, save_config, AppConfig, ConfigError, DEFAULT_CONFIG_PATH};
use lexedit::g2p::{G2pEngine, G2pError, SequiturEngine};
use lexedit::lexicon::{backup, Lexicon, LexiconEntry, LexiconError, LexiconFile};
use lexedit::ranking::{RankingError, RankingPipeline};

/// 명령줄 인자
#[derive(Parser, Debug)]
#[command(name = "lexedit", version, about = "Pronunciation lexicon curation tools")]
struct Cli {
    /// 설정 파일 (JSON)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// G2P 모델 경로 (설정 파일 값보다 우선)
    #[arg(short, long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 어휘를 G2P 신뢰도와 빈도로 정렬해 검토 대기열을 만듭니다
    Rank {
        /// 빈도순 어휘 파일
        #[arg(long)]
        vocabulary: Option<PathBuf>,
        /// 대기열 출력 파일
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// 앞에서부터 처리할 최대 단어 수
        #[arg(long)]
        cutoff: Option<usize>,
        /// 작업자 스레드 수
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// 단어 하나의 발음 후보를 출력합니다
    Variants {
        word: String,
        /// 후보 수
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// 여러 단어를 한 번의 엔진 호출로 변환합니다
    Phonemize {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// 발음 사전 편집
    #[command(subcommand)]
    Lexicon(LexiconCommand),
    /// 설정 파일 관리
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum LexiconCommand {
    /// 사전 전체 출력
    Show,
    /// 항목 추가 (여러 발음은 `|`로 구분)
    Add {
        word: String,
        #[arg(required = true, num_args = 1..)]
        phonemes: Vec<String>,
    },
    /// 단어의 첫 항목 삭제
    Remove { word: String },
    /// 단어 검색 (`^`로 시작하면 완전 일치)
    Search { query: String },
    /// 시각이 붙은 백업 생성
    Backup,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// 기본 설정 파일 생성
    Init,
    /// 현재 설정 출력
    Show,
}

/// 실행 중 발생할 수 있는 에러
#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Ranking(#[from] RankingError),
    #[error(transparent)]
    G2p(#[from] G2pError),
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("설정 직렬화 실패: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    // 로깅 초기화 (RUST_LOG로 조절)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = load_config(&cli.config);
    if let Some(model) = &cli.model {
        config.model_path = model.clone();
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<(), AppError> {
    let engine = SequiturEngine::new(config.sequitur_config());

    match cli.command {
        Command::Rank {
            vocabulary,
            output,
            cutoff,
            jobs,
        } => {
            let mut pipeline = RankingPipeline::new(engine);
            if let Some(jobs) = jobs.or(config.jobs) {
                pipeline = pipeline.with_jobs(jobs);
            }
            let vocabulary = vocabulary.unwrap_or(config.vocabulary_path);
            let output = output.unwrap_or(config.triage_path);
            let ranked = pipeline.run(&vocabulary, &output, cutoff.or(config.cutoff))?;
            let failures = ranked.iter().filter(|c| c.is_failure()).count();
            log::info!("완료: {}개 단어 (변환 실패 {}개) → {}", ranked.len(), failures, output.display());
        }
        Command::Variants { word, count } => {
            let count = count.unwrap_or(config.num_variants);
            let variants = engine.generate_variants(&word, count, true)?;
            if variants.is_empty() {
                log::warn!("발음 후보 없음: {}", word);
            }
            for (i, v) in variants.iter().enumerate() {
                println!("{}\t{}\t{}", i + 1, v.probability, v.transcription);
            }
        }
        Command::Phonemize { words } => {
            let phonemes = engine.generate_phonemes_multi(&words)?;
            for word in &words {
                match phonemes.get(word) {
                    Some(phn) => println!("{} {}", word, phn),
                    None => log::warn!("발음 없음: {}", word),
                }
            }
        }
        Command::Lexicon(command) => run_lexicon(command, &config)?,
        Command::Config(ConfigCommand::Init) => {
            save_config(&AppConfig::default(), &cli.config)?;
            log::info!("기본 설정 저장: {}", cli.config.display());
        }
        Command::Config(ConfigCommand::Show) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn run_lexicon(command: LexiconCommand, config: &AppConfig) -> Result<(), AppError> {
    match command {
        LexiconCommand::Show => {
            for entry in &Lexicon::load(&config.lexicon_path)? {
                println!("{}", entry.to_line());
            }
        }
        LexiconCommand::Add { word, phonemes } => {
            let mut file = LexiconFile::open(&config.lexicon_path, config.auto_save)?;
            file.add(LexiconEntry::new(word, phonemes.join(" "))?)?;
            file.flush()?;
        }
        LexiconCommand::Remove { word } => {
            let mut file = LexiconFile::open(&config.lexicon_path, config.auto_save)?;
            if file.remove_word(&word)?.is_none() {
                log::warn!("사전에 없는 단어: {}", word);
            }
            file.flush()?;
        }
        LexiconCommand::Search { query } => {
            let lexicon = Lexicon::load(&config.lexicon_path)?;
            match lexicon.search(&query).and_then(|i| lexicon.get(i).map(|e| (i, e))) {
                Some((index, entry)) => println!("{}\t{}", index, entry.to_line()),
                None => log::warn!("찾을 수 없음: {}", query),
            }
        }
        LexiconCommand::Backup => {
            let lexicon = Lexicon::load(&config.lexicon_path)?;
            let now = chrono::Local::now().naive_local();
            backup(&lexicon, &config.backup_dir, now)?;
        }
    }
    Ok(())
}
