//! fsmkit - Finite-Automata Workbench
//!
//! One-shot commands over automaton JSON documents, plus a local store of
//! named automata.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsmkit")]
#[command(about = "Finite-automata workbench: classify, simulate, determinize, minimize")]
#[command(version)]
struct Cli {
    /// Data directory for the local automaton store
    #[arg(short, long, default_value = ".fsmkit", env = "FSMKIT_DATA_DIR")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an automaton as DFA or NFA
    Classify {
        /// Automaton JSON file
        file: PathBuf,
    },

    /// Report type, completeness, epsilon and nondeterministic transitions
    Analyze {
        /// Automaton JSON file
        file: PathBuf,
    },

    /// Test whether an automaton accepts an input string
    Test {
        /// Automaton JSON file
        file: PathBuf,

        /// Input string (pass "" for the empty string)
        input: String,
    },

    /// Convert an NFA to an equivalent DFA by subset construction
    Convert {
        /// Automaton JSON file
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Minimize a DFA by partition refinement
    Minimize {
        /// Automaton JSON file
        file: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Save an automaton into the local store
    Save {
        /// Display name for the stored automaton
        name: String,

        /// Automaton JSON file
        file: PathBuf,
    },

    /// Load a stored automaton by record id
    Load {
        /// Record id
        id: String,

        /// Write the automaton here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List stored automata
    List,

    /// Delete a stored automaton by record id
    Delete {
        /// Record id
        id: String,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match commands::execute(&cli.data_dir, cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}
