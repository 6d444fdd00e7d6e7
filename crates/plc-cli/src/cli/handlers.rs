// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command handlers
//!
//! Each handler returns the process exit code. Toolchain failures are
//! rendered against the source and map to exit code 1; IO and config
//! problems propagate as `anyhow` errors.

use anyhow::{Context, anyhow};
use plc::{DiagnosticRenderer, Engine, InterpreterConfig, PlcError, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use super::config::CliConfig;
use super::{Cli, Commands};

/// Source text plus everything needed to report failures against it
struct Session {
    file_name: String,
    text: String,
    renderer: DiagnosticRenderer,
    quiet: bool,
}

impl Session {
    fn open(path: &Path, renderer: DiagnosticRenderer, quiet: bool) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            file_name: path.display().to_string(),
            text,
            renderer,
            quiet,
        })
    }

    /// Print a toolchain failure to stderr and return the failure exit code
    fn report(&self, error: &PlcError) -> anyhow::Result<i32> {
        let mut stderr = io::stderr().lock();
        if self.quiet {
            writeln!(
                stderr,
                "{}",
                self.renderer
                    .render_short(error, &self.file_name, &self.text)
            )?;
        } else {
            self.renderer
                .write(error, &self.file_name, &self.text, &mut stderr)?;
        }
        Ok(1)
    }
}

/// Load configuration, read the source file and run the selected command
pub fn execute(cli: &Cli) -> anyhow::Result<i32> {
    let config = CliConfig::resolve(cli)?;
    let renderer = if cli.no_color || config.no_color {
        DiagnosticRenderer::new().with_color(false)
    } else {
        DiagnosticRenderer::new()
    };
    let session = Session::open(cli.command.file(), renderer, cli.quiet)?;
    debug!(file = %session.file_name, bytes = session.text.len(), "loaded source");

    match &cli.command {
        Commands::Lex { .. } => handle_lex(&session),
        Commands::Parse { json, .. } => handle_parse(&session, *json),
        Commands::Check { .. } => handle_check(&session),
        Commands::Run {
            no_check,
            max_call_depth,
            ..
        } => {
            let mut interpreter = InterpreterConfig::default();
            if let Some(depth) = max_call_depth.or(config.max_call_depth) {
                interpreter = interpreter.with_max_call_depth(depth);
            }
            let check = config.check_before_run && !no_check;
            handle_run(&session, interpreter, check)
        }
        Commands::Generate { output, .. } => handle_generate(&session, output.as_deref()),
    }
}

fn handle_lex(session: &Session) -> anyhow::Result<i32> {
    let tokens = match plc::lex(&session.text) {
        Ok(tokens) => tokens,
        Err(err) => return session.report(&err),
    };
    let mut stdout = io::stdout().lock();
    for token in tokens {
        writeln!(stdout, "{token}")?;
    }
    Ok(0)
}

fn handle_parse(session: &Session, json: bool) -> anyhow::Result<i32> {
    let source = match plc::parse(&session.text) {
        Ok(source) => source,
        Err(err) => return session.report(&err),
    };
    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &source)?;
        writeln!(stdout)?;
    } else {
        writeln!(stdout, "{source:#?}")?;
    }
    Ok(0)
}

fn handle_check(session: &Session) -> anyhow::Result<i32> {
    let program = match Engine::new().compile(&session.text) {
        Ok(program) => program,
        Err(err) => return session.report(&err),
    };
    if !session.quiet {
        println!(
            "{}: ok ({} fields, {} methods)",
            session.file_name,
            program.source.fields.len(),
            program.source.methods.len()
        );
    }
    Ok(0)
}

fn handle_run(session: &Session, config: InterpreterConfig, check: bool) -> anyhow::Result<i32> {
    let engine = Engine::with_config(config);
    debug!(check, max_call_depth = config.max_call_depth, "running program");

    let stdout = io::stdout().lock();
    let result = if check {
        engine
            .compile(&session.text)
            .and_then(|program| engine.run(&program, stdout))
    } else {
        plc::parse(&session.text).and_then(|source| engine.run_unchecked(&source, stdout))
    };

    match result {
        Ok(Value::Integer(value)) => Ok(i32::try_from(&value).unwrap_or_else(|_| {
            debug!(%value, "main result does not fit an exit code");
            0
        })),
        Ok(_) => Ok(0),
        Err(err) => session.report(&err),
    }
}

fn handle_generate(session: &Session, output: Option<&Path>) -> anyhow::Result<i32> {
    let engine = Engine::new();
    let java = match engine.compile(&session.text).and_then(|program| engine.generate(&program)) {
        Ok(java) => java,
        Err(err) => return session.report(&err),
    };
    match output {
        Some(path) => fs::write(path, format!("{java}\n"))
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{java}")?;
        }
    }
    Ok(0)
}

/// Flush stdout before the process exits with `code`
pub fn finish(code: i32) -> anyhow::Result<i32> {
    io::stdout()
        .flush()
        .map_err(|err| anyhow!("failed to flush output: {err}"))?;
    Ok(code)
}
