//! balas - chat transcript parsing and reply matching CLI
//!
//! Usage:
//!   balas parse chat.txt
//!   balas match chat.txt "what is your moq"
//!   balas reply chat.txt
//!   balas tags chat.txt
//!   balas check

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balas_core::{defaults, EmbeddingBackend, GenerationBackend, InferenceBackend, MatchType};
use balas_inference::{ConversationTagger, OllamaBackend, ReplyComposer};
use balas_match::{EmbeddingStore, MatchConfig, MatchEngine};
use balas_parse::{ParserOptions, TranscriptParser};

#[derive(Debug)]
enum Command {
    Parse { files: Vec<PathBuf> },
    Match { file: PathBuf, query: String },
    Reply { file: PathBuf },
    Tags { file: PathBuf },
    Check,
}

#[derive(Debug)]
struct Args {
    command: Command,
    json: bool,
}

fn parse_args() -> Args {
    let argv: Vec<String> = env::args().collect();

    let mut json = false;
    let mut positionals: Vec<String> = Vec::new();

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--json" | "-j" => json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {}", other);
                print_help();
                std::process::exit(1);
            }
            other => positionals.push(other.to_string()),
        }
        i += 1;
    }

    let Some((name, rest)) = positionals.split_first() else {
        print_help();
        std::process::exit(1);
    };

    let command = match name.as_str() {
        "parse" => {
            if rest.is_empty() {
                eprintln!("parse requires at least one file");
                std::process::exit(1);
            }
            Command::Parse {
                files: rest.iter().map(PathBuf::from).collect(),
            }
        }
        "match" => {
            if rest.len() != 2 {
                eprintln!("match requires a file and a query");
                std::process::exit(1);
            }
            Command::Match {
                file: PathBuf::from(&rest[0]),
                query: rest[1].clone(),
            }
        }
        "reply" => {
            if rest.len() != 1 {
                eprintln!("reply requires exactly one file");
                std::process::exit(1);
            }
            Command::Reply {
                file: PathBuf::from(&rest[0]),
            }
        }
        "tags" => {
            if rest.len() != 1 {
                eprintln!("tags requires exactly one file");
                std::process::exit(1);
            }
            Command::Tags {
                file: PathBuf::from(&rest[0]),
            }
        }
        "check" => Command::Check,
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            std::process::exit(1);
        }
    };

    Args { command, json }
}

fn print_help() {
    println!(
        r#"
balas - chat transcript parsing and reply matching

Usage: balas <COMMAND> [OPTIONS]

Commands:
  parse <FILE>...        Parse transcript files and print a summary
  match <FILE> <QUERY>   Index a transcript and match a query against it
  reply <FILE>           Suggest a reply for the conversation tail
  tags <FILE>            Generate topic tags for a conversation
  check                  Check that the inference backend is reachable

Options:
  -j, --json             Print full JSON output (parse)
  -h, --help             Print help

A FILE of "-" reads the transcript from stdin.

Environment Variables:
  OLLAMA_BASE                Ollama server URL (default: http://127.0.0.1:11434)
  OLLAMA_EMBED_MODEL         Embedding model (default: nomic-embed-text)
  OLLAMA_GEN_MODEL           Generation model (default: gpt-oss:20b)
  BALAS_MATCH_THRESHOLD      Semantic match threshold (default: 0.7)
  BALAS_PARSE_CONTINUATIONS  Append non-message lines to the previous message
  LOG_FORMAT                 "json" or "text" (default: "text")
  LOG_FILE                   Path to log file (optional, enables file logging)

Examples:
  balas parse chat.txt
  balas parse --json chat.txt
  balas match chat.txt "what is your moq"
  balas reply chat.txt
  balas check
"#
    );
}

fn transcript_parser() -> TranscriptParser {
    TranscriptParser::with_options(ParserOptions::from_env())
}

/// Read a transcript document from a file, or from stdin when the
/// path is "-".
fn read_document(file: &PathBuf) -> std::io::Result<String> {
    if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(file)
    }
}

async fn cmd_parse(files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let parser = transcript_parser();
    let mut failures = 0usize;

    for file in files {
        match read_document(file) {
            Ok(document) => {
                let transcript = parser.parse(&document);
                if json {
                    println!("{}", serde_json::to_string_pretty(&transcript)?);
                } else {
                    println!("{}", file.display());
                    println!("  Title:    {}", transcript.title);
                    println!(
                        "  Client:   {} ({})",
                        transcript.client_name, transcript.client_phone
                    );
                    println!("  Messages: {}", transcript.message_count());
                    println!("  Media:    {}", transcript.media_count());
                }
            }
            Err(e) => {
                eprintln!("{}: {}", file.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} file(s) failed", failures);
    }
    Ok(())
}

async fn cmd_match(file: &PathBuf, query: &str) -> anyhow::Result<()> {
    let document = read_document(file)?;
    let transcript = transcript_parser().parse(&document);

    let backend = Arc::new(OllamaBackend::from_env());
    let store = Arc::new(EmbeddingStore::new(backend.clone()));
    let engine =
        MatchEngine::new(backend, store.clone()).with_config(MatchConfig::from_env());

    let indexed = match store.insert_messages(&transcript.messages).await {
        Ok(n) => n,
        Err(e) => {
            eprintln!("Indexing failed ({}), matching on keyword rules only", e);
            0
        }
    };
    println!(
        "Indexed {} of {} message(s) from \"{}\"",
        indexed,
        transcript.message_count(),
        transcript.title
    );

    let result = engine.find_match(query).await;
    match result.match_type {
        MatchType::Semantic => {
            println!("Semantic match (score {:.3})", result.score);
            if let Some(sender) = &result.source_sender {
                println!("  From: {}", sender);
            }
            if let Some(text) = &result.best_text {
                println!("  Text: {}", text);
            }
        }
        MatchType::Keyword => {
            println!("Keyword match");
            if let Some(text) = &result.best_text {
                println!("  Response: {}", text);
            }
        }
        MatchType::None => {
            println!("No match found");
        }
    }
    Ok(())
}

async fn cmd_reply(file: &PathBuf) -> anyhow::Result<()> {
    let document = read_document(file)?;
    let transcript = transcript_parser().parse(&document);

    if transcript.messages.is_empty() {
        println!("No messages in transcript, nothing to reply to");
        return Ok(());
    }

    let backend = Arc::new(OllamaBackend::from_env());
    let composer = ReplyComposer::new(backend);
    let reply = composer.suggest_or_fallback(&transcript.messages).await;
    println!("{}", reply);
    Ok(())
}

async fn cmd_tags(file: &PathBuf) -> anyhow::Result<()> {
    let document = read_document(file)?;
    let transcript = transcript_parser().parse(&document);

    if transcript.messages.is_empty() {
        println!("No messages in transcript, nothing to tag");
        return Ok(());
    }

    let text = transcript
        .messages
        .iter()
        .map(|m| format!("{}: {}", m.sender, m.text))
        .collect::<Vec<_>>()
        .join("\n");

    let backend = Arc::new(OllamaBackend::from_env());
    let tagger = ConversationTagger::new(backend);
    let tags = tagger.tag(&text).await;

    if tags.is_empty() {
        println!("No tags generated");
    } else {
        println!("{}", tags.join(", "));
    }
    Ok(())
}

async fn cmd_check() -> anyhow::Result<()> {
    let base_url =
        env::var("OLLAMA_BASE").unwrap_or_else(|_| defaults::OLLAMA_URL.to_string());
    let backend = OllamaBackend::from_env();

    println!("Backend: {}", base_url);
    println!("  Embedding model:  {}", EmbeddingBackend::model_name(&backend));
    println!("  Generation model: {}", GenerationBackend::model_name(&backend));

    let healthy = backend.health_check().await?;
    if healthy {
        println!("  Status: healthy");
        Ok(())
    } else {
        anyhow::bail!("backend at {} is not reachable", base_url)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = parse_args();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("balas.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    match &args.command {
        Command::Parse { files } => cmd_parse(files, args.json).await,
        Command::Match { file, query } => cmd_match(file, query).await,
        Command::Reply { file } => cmd_reply(file).await,
        Command::Tags { file } => cmd_tags(file).await,
        Command::Check => cmd_check().await,
    }
}
