use std::path::PathBuf;
use std::process;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use rift::{exit_code, Rift};

const HISTORY_FILE: &str = ".rift_history";

fn history_path() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(HISTORY_FILE))
}

fn run_repl() -> i32 {
    let mut rift = Rift::new();
    let mut editor = DefaultEditor::new().expect("failed to initialize line editor");

    let history = history_path();
    if let Some(path) = &history {
        let _ = editor.load_history(path);
    }

    println!("Rift — type 'exit' or 'quit' to leave");

    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line.as_str());
                rift.run(&line);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => {
                eprintln!("rift: readline error: {error}");
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = editor.save_history(path);
    }

    exit_code::OK
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let code = match args.len() {
        1 => run_repl(),
        2 => Rift::new().run_file(&args[1]),
        _ => {
            eprintln!("usage: rift [script]");
            exit_code::USAGE
        }
    };

    process::exit(code);
}
