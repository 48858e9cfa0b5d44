use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use wordnet_db::{LoadMode, WordNet};
use wordnet_morphy::Morphy;

use simlex_sample::report::render_console;
use simlex_sample::{WordNetOntology, run};

const DEFAULT_INPUT: &str = "input_file.csv";
const DEFAULT_OUTPUT: &str = "table.csv";
const DEFAULT_SEED: u64 = 0;
const DEFAULT_WORDNET_PATH: &str = "wordnet/dict";
const DEFAULT_WORDNET_SYSTEM_PATH: &str = "/usr/share/wordnet";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("reading pairs from {}", config.input_path.display());
    info!("writing table to {}", config.output_path.display());
    info!(
        "using wordnet at {} (mode: {:?})",
        config.wordnet_path.display(),
        config.wordnet_mode
    );
    info!("sampling seed {}", config.seed);

    let wn_start = Instant::now();
    let wordnet = WordNet::load_with_mode(&config.wordnet_path, config.wordnet_mode)
        .with_context(|| format!("loading WordNet from {}", config.wordnet_path.display()))?;
    let morphy = Morphy::load(&config.wordnet_path)?;
    info!(
        "wordnet loaded in {} ms ({} synsets, {} exceptions)",
        wn_start.elapsed().as_millis(),
        wordnet.synset_count(),
        morphy.exception_count()
    );

    let ontology = WordNetOntology::new(&wordnet, &morphy);
    let pairs = run(&ontology, &config.input_path, &config.output_path, config.seed)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(render_console(&pairs).as_bytes())?;
    stdout.flush()?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    input_path: PathBuf,
    output_path: PathBuf,
    seed: u64,
    wordnet_path: PathBuf,
    wordnet_mode: LoadMode,
}

fn load_config() -> Config {
    let mut cli_wordnet_dir: Option<PathBuf> = None;
    let mut cli_wordnet_mode: Option<LoadMode> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--wordnet-dir" => {
                if let Some(path) = args.next() {
                    cli_wordnet_dir = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--wordnet-dir=") {
                    cli_wordnet_dir = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--wordnet-mode=") {
                    cli_wordnet_mode = parse_load_mode(mode);
                }
            }
        }
    }

    let input_path = env::var("SIMLEX_INPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_INPUT));
    let output_path = env::var("SIMLEX_OUTPUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT));
    let seed = env::var("SIMLEX_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let wordnet_path = cli_wordnet_dir
        .or_else(|| env::var("WORDNET_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(default_wordnet_path);
    let wordnet_mode = cli_wordnet_mode
        .or_else(|| {
            env::var("WORDNET_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);

    Config {
        input_path,
        output_path,
        seed,
        wordnet_path,
        wordnet_mode,
    }
}

fn default_wordnet_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_WORDNET_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_WORDNET_SYSTEM_PATH)
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
