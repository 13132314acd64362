//! logq: interactive natural-language to SPL translator.
//!
//! Fits the hybrid parser on the configured corpus, logs the training-set
//! evaluation, then reads one request per line from stdin and asks about
//! any slot it could not resolve.

use std::io::{self, BufRead, Write};

use tracing_subscriber::EnvFilter;

use logq_parser::{eval, HybridParser, Mode, ParserConfig, ParserError, StdioPrompter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logq starting");

    // ── Load config ─────────────────────────────────────────────
    let config = match std::env::args().nth(1) {
        Some(path) => ParserConfig::from_file(&path)?,
        None => {
            tracing::info!("no config file given, using built-in defaults");
            ParserConfig::default()
        }
    };

    // ── Fit ─────────────────────────────────────────────────────
    let (parser, examples) = HybridParser::from_config(&config, |file| Box::new(file))?;
    let report = eval::evaluate(&parser, &examples, 0);
    tracing::info!(
        exact = report.hybrid.exact_accuracy(),
        drift_log = %config.drift_log_path,
        "parser ready"
    );

    // ── Read loop ───────────────────────────────────────────────
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "logq> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let mut prompter = StdioPrompter::new(&mut input, &mut stdout);
        match parser.parse(text, Mode::Interactive(&mut prompter)) {
            Ok(parsed) => {
                writeln!(stdout, "slots: {}", serde_json::to_string(&parsed.slots)?)?;
                writeln!(stdout, "spl:   {}", parsed.query)?;
            }
            Err(ParserError::Aborted(slot)) => {
                tracing::info!(%slot, "input closed during clarification");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!("logq exiting");
    Ok(())
}
