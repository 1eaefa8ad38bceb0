//! Entry point for the sandboxed guest binary.
//!
//! stdin carries the task, stdout carries the envelope, stderr carries
//! free-form diagnostics (tune with `RUST_LOG`; contract logic must ignore
//! it). A non-zero exit signals a fatal error; the envelope on stdout is
//! still emitted best-effort so the host has a structured reason.

use std::io::Read;
use std::process::ExitCode;

use anyhow::Context;
use types::Envelope;

/// Emitted when even the error envelope fails to serialize.
const FALLBACK_ENVELOPE: &str = r#"{"success":false,"result":null,"error":"internal error"}"#;

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(envelope) => {
            println!("{envelope}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let reason = format!("{err:#}");
            log::error!("{reason}");
            match serde_json::to_string(&Envelope::failure(reason)) {
                Ok(envelope) => println!("{envelope}"),
                Err(_) => println!("{FALLBACK_ENVELOPE}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading the task from stdin")?;
    Ok(engine::execute(&input)?)
}
