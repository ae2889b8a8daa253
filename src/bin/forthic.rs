//! Command-line host for the Forthic interpreter
//!
//! Usage:
//!   forthic                 Start an interactive REPL
//!   forthic script.forthic  Run a script file and print the final stack

use clap::Parser;
use colored::Colorize;
use forthic::{ForthicError, Interpreter};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "forthic")]
#[command(about = "Run Forthic scripts or start an interactive REPL", long_about = None)]
#[command(version)]
struct Cli {
    /// Forthic script to run. Starts a REPL if omitted.
    script: Option<PathBuf>,

    /// IANA timezone used for date/time words
    #[arg(short, long, default_value = "UTC")]
    timezone: String,
}

fn main() {
    let cli = Cli::parse();

    let code = match &cli.script {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(code) => Some(code),
            Err(e) => {
                eprintln!("{} {}: {}", "error:".red().bold(), path.display(), e);
                process::exit(1);
            }
        },
        None => None,
    };

    let mut interp = Interpreter::new(&cli.timezone);

    match code {
        Some(code) => run_script(&mut interp, &code),
        None => run_repl(&mut interp),
    }
}

fn run_script(interp: &mut Interpreter, code: &str) {
    if let Err(e) = interp.run(code) {
        eprintln!("{}", format_error(&e));
        process::exit(1);
    }
    print_stack(interp);
}

fn run_repl(interp: &mut Interpreter) {
    println!("Forthic REPL. Type a line of Forthic code, or {} to exit.", "QUIT".cyan());

    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(1);
        }
    };

    let history_path = dirs_history_path();
    if let Some(path) = &history_path {
        let _ = editor.load_history(path);
    }

    loop {
        match editor.readline("forthic> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line.as_str());
                if line.trim() == "QUIT" {
                    break;
                }
                match interp.run(&line) {
                    Ok(()) => print_stack(interp),
                    Err(e) => eprintln!("{}", format_error(&e)),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    if let Some(path) = &history_path {
        let _ = editor.save_history(path);
    }
}

fn print_stack(interp: &Interpreter) {
    let items = interp.get_stack().items();
    if items.is_empty() {
        println!("{}", "(empty stack)".dimmed());
        return;
    }
    let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
    println!("[{}]", rendered.join(" "));
}

fn format_error(e: &ForthicError) -> String {
    format!("{} {}", "error:".red().bold(), e.format_with_context())
}

fn dirs_history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".forthic_history"))
}
