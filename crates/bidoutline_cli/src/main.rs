//! CLI entry point for outline normalization.
//!
//! # Responsibility
//! - Normalize a raw project (or bare `documentDirectory`) JSON file.
//! - Print canonical JSON or a rendered tree for quick review.
//!
//! Usage: `bidoutline_cli <json|tree> <path> [format|directory]`
//!
//! Logs go to `$BIDOUTLINE_LOG_DIR` when that variable holds an absolute path.

use bidoutline_core::normalize::DOCUMENT_DIRECTORY_KEY;
use bidoutline_core::tree::render_document;
use bidoutline_core::{default_log_level, init_logging, normalize, NormalizeMode, RawOutline};
use serde_json::Value;
use std::process::ExitCode;

const USAGE: &str = "usage: bidoutline_cli <json|tree> <path> [format|directory]";

enum Output {
    Json,
    Tree,
}

fn main() -> ExitCode {
    match run(std::env::args().skip(1).collect()) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<String, String> {
    if let Ok(log_dir) = std::env::var("BIDOUTLINE_LOG_DIR") {
        init_logging(default_log_level(), &log_dir)?;
    }

    let output = match args.first().map(String::as_str) {
        Some("json") => Output::Json,
        Some("tree") => Output::Tree,
        _ => return Err(USAGE.to_string()),
    };
    let path = args.get(1).ok_or_else(|| USAGE.to_string())?;
    let mode = match args.get(2) {
        Some(value) => NormalizeMode::parse(value)
            .ok_or_else(|| format!("unknown mode `{value}`; expected format|directory"))?,
        None => NormalizeMode::default(),
    };

    let text = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read `{path}`: {err}"))?;
    let value: Value =
        serde_json::from_str(&text).map_err(|err| format!("invalid JSON in `{path}`: {err}"))?;

    let raw = if value.get(DOCUMENT_DIRECTORY_KEY).is_some() {
        RawOutline::from_project(&value)
    } else {
        RawOutline::from_directory(&value)
    };
    log::info!(
        "event=cli_normalize module=cli status=start source={} mode={}",
        raw.kind(),
        mode.as_str()
    );
    let doc = normalize(raw, mode);

    match output {
        Output::Json => serde_json::to_string_pretty(&doc)
            .map_err(|err| format!("failed to encode outline: {err}")),
        Output::Tree => Ok(render_document(&doc)),
    }
}
