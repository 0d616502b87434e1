//! Command execution.

use crate::Commands;
use colored::Colorize;
use fsmkit_core::{accept, analyze, is_complete, minimize, to_dfa, Automaton, AutomatonType};
use fsmkit_store::AutomatonStore;
use std::fs;
use std::path::{Path, PathBuf};

type CmdResult = Result<String, Box<dyn std::error::Error>>;

/// Executes a command and returns the formatted output.
pub fn execute(data_dir: &Path, cmd: Commands) -> CmdResult {
    match cmd {
        Commands::Classify { file } => {
            let automaton = read_automaton(&file)?;
            Ok(format_type(automaton.automaton_type()).to_string())
        }

        Commands::Analyze { file } => {
            let automaton = read_automaton(&file)?;
            let analysis = analyze(&automaton);

            let mut output = format!(
                "Type: {}\nComplete DFA: {}\nStates: {}, transitions: {}\n",
                format_type(automaton.automaton_type()),
                if is_complete(&automaton) {
                    "yes".green()
                } else {
                    "no".yellow()
                },
                automaton.states().len(),
                automaton.transitions().len(),
            );

            if analysis.has_epsilon_transitions {
                output.push_str("Epsilon transitions:\n");
                for t in &analysis.epsilon_transitions {
                    output.push_str(&format!("  {}\n", t));
                }
            }

            if analysis.has_nondeterministic_transitions {
                output.push_str("Nondeterministic transitions:\n");
                for group in &analysis.nondeterministic_transitions {
                    let destinations = group
                        .destinations
                        .iter()
                        .map(|d| d.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    output.push_str(&format!(
                        "  {} --{}--> {{{}}}\n",
                        group.from, group.symbol, destinations
                    ));
                }
            }

            Ok(output)
        }

        Commands::Test { file, input } => {
            let automaton = read_automaton(&file)?;
            let result = accept(&automaton, &input);

            let verdict = if result.accepted {
                "Accepted".green()
            } else {
                "Rejected".red()
            };

            match result.path {
                Some(path) => Ok(format!("{}\n  Path: {}", verdict, path.join(" -> "))),
                None => Ok(format!("{}\n  No start state", verdict)),
            }
        }

        Commands::Convert { file, output } => {
            let automaton = read_automaton(&file)?;
            let dfa = to_dfa(&automaton);
            let summary = format!(
                "{} {} -> {} ({} states)",
                "Converted".green(),
                automaton.automaton_type(),
                dfa.automaton_type(),
                dfa.states().len()
            );
            write_or_print(&dfa, output, &summary)
        }

        Commands::Minimize { file, output } => {
            let automaton = read_automaton(&file)?;
            let min = minimize(&automaton);
            let summary = format!(
                "{} {} states -> {} states",
                "Minimized".green(),
                automaton.states().len(),
                min.states().len()
            );
            write_or_print(&min, output, &summary)
        }

        Commands::Save { name, file } => {
            let automaton = read_automaton(&file)?;
            let store = AutomatonStore::open(data_dir)?;
            let id = store.save(&name, &automaton)?;
            Ok(format!("{} {} as {}", "Saved".green(), name.cyan(), id))
        }

        Commands::Load { id, output } => {
            let store = AutomatonStore::open(data_dir)?;
            match store.load(&id)? {
                Some(record) => {
                    let summary = format!(
                        "{} ({}, {} states)",
                        record.name.cyan(),
                        format_type(record.automaton.automaton_type()),
                        record.automaton.states().len()
                    );
                    write_or_print(&record.automaton, output, &summary)
                }
                None => Err(format!("no stored automaton with id {id}").into()),
            }
        }

        Commands::List => {
            let store = AutomatonStore::open(data_dir)?;
            let records = store.list()?;

            if records.is_empty() {
                return Ok("No stored automata".yellow().to_string());
            }

            let mut output = String::new();
            for record in records {
                output.push_str(&format!(
                    "  {}  {}  ({}, {} states)\n",
                    record.id,
                    record.name.cyan(),
                    format_type(record.automaton.automaton_type()),
                    record.automaton.states().len()
                ));
            }
            Ok(output)
        }

        Commands::Delete { id } => {
            let store = AutomatonStore::open(data_dir)?;
            store.delete(&id)?;
            Ok(format!("{} {}", "Deleted".green(), id))
        }
    }
}

fn read_automaton(path: &Path) -> Result<Automaton, Box<dyn std::error::Error>> {
    let data = fs::read_to_string(path)?;
    let automaton: Automaton = serde_json::from_str(&data)?;
    Ok(automaton)
}

fn write_or_print(automaton: &Automaton, output: Option<PathBuf>, summary: &str) -> CmdResult {
    let json = serde_json::to_string_pretty(automaton)?;
    match output {
        Some(path) => {
            fs::write(&path, json)?;
            Ok(format!("{} -> {}", summary, path.display()))
        }
        None => Ok(format!("{}\n{}", summary, json)),
    }
}

fn format_type(ty: AutomatonType) -> colored::ColoredString {
    match ty {
        AutomatonType::Dfa => "DFA".cyan(),
        AutomatonType::Nfa => "NFA".magenta(),
    }
}
