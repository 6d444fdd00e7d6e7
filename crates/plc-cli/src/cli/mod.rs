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

//! Argument definitions and command dispatch

pub mod config;
pub mod handlers;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "plc")]
#[command(about = "PLC teaching language toolchain")]
#[command(version)]
#[command(author = "OctoFHIR Team <funyloony@gmail.com>")]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print one-line error summaries
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Log phase progress to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Configuration file, instead of .plcrc or ~/.config/plc/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the token stream
    Lex {
        /// Source file
        file: PathBuf,
    },
    /// Print the syntax tree
    Parse {
        /// Source file
        file: PathBuf,
        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse and analyze without running
    Check {
        /// Source file
        file: PathBuf,
    },
    /// Run the program; the exit code is the value returned by main
    Run {
        /// Source file
        file: PathBuf,
        /// Skip static analysis
        #[arg(long)]
        no_check: bool,
        /// Maximum nesting of calls
        #[arg(long, value_name = "N")]
        max_call_depth: Option<usize>,
    },
    /// Emit Java source
    Generate {
        /// Source file
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    /// Source file the command operates on
    pub fn file(&self) -> &Path {
        match self {
            Commands::Lex { file }
            | Commands::Parse { file, .. }
            | Commands::Check { file }
            | Commands::Run { file, .. }
            | Commands::Generate { file, .. } => file,
        }
    }
}
