// Line-protocol driver for the word-suggestion session.
// Reads one command per line on stdin and answers with the session state on
// stdout, so the interaction logic can be scripted without a terminal.
//
//   TYPE <text> | SPACE | CLICK <offset> | SELECT <index> | DISMISS
//   CURSOR <offset> | BACKSPACE | STATE | EXIT
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use akshar::backend::{HttpTransliterator, TableTransliterator, Transliterator};
use akshar::core::overlay::EntryStyle;
use akshar::core::types::TransliterationRequest;
use akshar::logging::init_logging;
use akshar::{Config, DelimiterOutcome, WordSuggestionSession};
use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "akshar-sim", version, about = "Scriptable word-suggestion session")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    backend_url: Option<String>,
    /// Answer from a JSON word table instead of the backend
    #[arg(long)]
    table: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("akshar-sim: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> akshar::Result<()> {
    let mut config = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load_or_default(&path)?,
        None => Config::default(),
    };
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }
    let verbosity = cli.verbose.max(config.logging.verbosity);
    // stdout carries the protocol, so logs go to stderr unless a file is set
    init_logging(verbosity, config.logging.file.as_deref(), config.logging.truncate)?;

    let backend: Box<dyn Transliterator> = match &cli.table {
        Some(path) => Box::new(TableTransliterator::from_json_file(path)?),
        None => Box::new(HttpTransliterator::from_config(&config.backend)?),
    };

    let mut session = WordSuggestionSession::from_config(&config);
    tracing::info!("simulator starting");
    run_script(
        io::stdin().lock(),
        &mut io::stdout(),
        &mut session,
        backend.as_ref(),
    )?;
    tracing::info!("simulator shutting down");
    Ok(())
}

/// Runs commands from `input` until EXIT or end of input, reporting the
/// session state to `output` after each one.
fn run_script(
    input: impl BufRead,
    output: &mut impl Write,
    session: &mut WordSuggestionSession,
    backend: &dyn Transliterator,
) -> io::Result<()> {
    for line in input.lines() {
        let input = line?;
        tracing::debug!(input = %input, "<-");
        let (command, arg) = input.split_once(' ').unwrap_or((input.as_str(), ""));

        if command == "EXIT" {
            tracing::info!("received EXIT");
            break;
        }
        if let Err(message) = handle_command(command, arg, session, backend) {
            tracing::warn!(%command, %message, "command rejected");
            writeln!(output, "ERROR {message}")?;
        }
        report(session, output)?;
    }
    Ok(())
}

fn handle_command(
    command: &str,
    arg: &str,
    session: &mut WordSuggestionSession,
    backend: &dyn Transliterator,
) -> Result<(), String> {
    match command {
        "TYPE" => session.insert_text(arg),
        "SPACE" => {
            if let DelimiterOutcome::Requested(request) = session.commit_on_delimiter(' ') {
                resolve(session, backend, request);
            }
        }
        "CLICK" => {
            if let Some(request) = session.pointer_release(parse_number(arg)?) {
                resolve(session, backend, request);
            }
        }
        "SELECT" => {
            if !session.select_suggestion(parse_number(arg)?) {
                return Err(format!("no overlay entry {arg}"));
            }
        }
        "DISMISS" => session.dismiss(),
        "CURSOR" => session.set_cursor(parse_number(arg)?),
        "BACKSPACE" => session.delete_backward(),
        "STATE" => {}
        other => return Err(format!("unknown command {other:?}")),
    }
    Ok(())
}

/// The simulator has no event loop, so every request completes right away.
fn resolve(
    session: &mut WordSuggestionSession,
    backend: &dyn Transliterator,
    request: TransliterationRequest,
) {
    let result = backend.transliterate(&request.word);
    let outcome = session.complete(request.token, result);
    tracing::debug!(word = %request.word, ?outcome, "resolved");
}

fn parse_number(arg: &str) -> Result<usize, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected a number, got {arg:?}"))
}

fn report(session: &WordSuggestionSession, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "BUFFER {}", session.buffer())?;
    writeln!(out, "CURSOR {}", session.cursor())?;

    let entries = session.overlay().entries();
    if entries.is_empty() {
        writeln!(out, "HIDE_OVERLAY")?;
    } else {
        for (i, entry) in entries.iter().enumerate() {
            let tag = match entry.style {
                EntryStyle::Candidate => "candidate",
                EntryStyle::Original => "original",
            };
            writeln!(out, "ADD_CANDIDATE {} '{}' {}", i, entry.text, tag)?;
        }
        writeln!(out, "SHOW_OVERLAY")?;
    }
    out.flush()
}
