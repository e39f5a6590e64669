//! Call Sentiment Analyzer — Binary Entrypoint
//! Reads one transcript, resolves its words against the lexicon (asking the operator
//! about unknown ones), and prints the final report.

use anyhow::{anyhow, Context, Result};
use call_sentiment_analyzer::config::{ENV_CONFIG_PATH, ENV_LEXICON_PATH};
use call_sentiment_analyzer::telemetry::init_tracing;
use call_sentiment_analyzer::{
    analyze, AnalyzerConfig, ConsoleOperator, DeclineAll, JsonFileStore, LexiconStore,
    LineEditorOperator, MemoryStore, Operator, Resolver, ScriptedOperator,
};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "call-sentiment-analyzer",
    version,
    about = "Sentiment and service-protocol analysis for call transcripts"
)]
struct Args {
    /// Transcript file (defaults to [transcript].path from the config)
    transcript: Option<PathBuf>,

    /// Lexicon JSON file
    #[arg(long, env = ENV_LEXICON_PATH)]
    lexicon: Option<PathBuf>,

    /// Analyzer config (TOML)
    #[arg(long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Decline every unknown word without prompting
    #[arg(long, conflicts_with = "answers")]
    non_interactive: bool,

    /// Replay operator answers from a file, one per line
    #[arg(long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Keep registrations in memory; the lexicon file is not written
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the token list before resolving
    #[arg(long)]
    show_tokens: bool,
}

fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let cfg = AnalyzerConfig::load(args.config.as_deref())?;

    let lexicon_path = args.lexicon.clone().unwrap_or_else(|| cfg.lexicon.path.clone());
    let transcript_path = args
        .transcript
        .clone()
        .or_else(|| cfg.transcript.path.clone())
        .ok_or_else(|| anyhow!("no transcript given (pass a path or set [transcript].path)"))?;

    let text = std::fs::read_to_string(&transcript_path)
        .with_context(|| format!("reading transcript {}", transcript_path.display()))?;

    let file_store = JsonFileStore::new(&lexicon_path);
    let mut lexicon = file_store.load_all()?;
    let memory_store;
    let store: &dyn LexiconStore = if args.dry_run {
        memory_store = MemoryStore::new(lexicon.clone());
        &memory_store
    } else {
        &file_store
    };

    let mut operator: Box<dyn Operator> = if args.non_interactive {
        Box::new(DeclineAll)
    } else if let Some(path) = &args.answers {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("reading answers {}", path.display()))?;
        Box::new(ScriptedOperator::from_lines(&script))
    } else if args.json {
        // prompts on stderr, stdout carries the JSON only
        Box::new(ConsoleOperator::new(io::stdin().lock(), io::stderr()))
    } else {
        Box::new(LineEditorOperator::new().context("starting line editor")?)
    };

    if args.show_tokens {
        println!("Tokens detected:");
        for t in call_sentiment_analyzer::tokenize(&text) {
            println!("{t}");
        }
    }

    info!(
        lexicon = %lexicon_path.display(),
        entries = lexicon.len(),
        dry_run = args.dry_run,
        "starting analysis"
    );
    let mut resolver = Resolver::new(store, &mut *operator)
        .with_params(cfg.ranker_params())
        .with_score_range(cfg.scoring);
    let analysis = analyze(&text, &mut lexicon, &mut resolver)?;

    let report = analysis
        .report
        .with_transcript(transcript_path.display().to_string());
    if args.json {
        println!("{}", report.to_json().context("serializing report")?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
