#![cfg(feature = "cli")]

mod app;
mod cli;
mod commands;

use rustyline::error::ReadlineError;
use rustyline::Editor;

use app::App;
use cli::CliArgs;
use commands::Outcome;

const PROLOGUE: &str = "qsynth-i - interactive quantum-circuit synthesis shell\ntype `help` for a command reference\n";
const SIGN: &str = "qsynth> ";

/// Run every line of a do-file in order, stopping at the first error;
/// only error prevents a subsequent do-file from continuing.
fn run_file(app: &mut App, path: &str) -> i32 {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("could not read {path}: {err}");
            return 1;
        }
    };

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match commands::process(app, line) {
            Outcome::Error(msg) => {
                eprintln!("{msg}");
                abort_if_fatal(&msg);
                return 1;
            }
            Outcome::Quit => return 0,
            Outcome::Done | Outcome::NoOp => {}
        }
    }
    0
}

/// `Fatal` is "log + abort", the one error kind more severe
/// than "report and return `error`". `Error::Fatal`'s `Display` is the only
/// kind prefixed `fatal:` (see `error.rs`), so that prefix is the signal
/// once the error has crossed into a plain `String` at the command boundary.
fn abort_if_fatal(msg: &str) {
    if msg.starts_with("fatal:") {
        std::process::exit(1);
    }
}

fn main() {
    let args = CliArgs::new();
    let mut app = App::default();

    if let Some(path) = &args.input {
        let code = run_file(&mut app, path);
        if args.quit {
            std::process::exit(code);
        }
    }

    print!("{PROLOGUE}");
    let mut interact = Editor::<()>::new();
    let _ = interact.load_history(&args.history);

    loop {
        match interact.readline(SIGN) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                interact.add_history_entry(line);
                match commands::process(&mut app, line) {
                    Outcome::Error(msg) => {
                        eprintln!("{msg}\n");
                        abort_if_fatal(&msg);
                    }
                    Outcome::Quit => break,
                    Outcome::Done | Outcome::NoOp => {}
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("Exit: Keyboard Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("Exit: End of File");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    let _ = interact.save_history(&args.history);
}
