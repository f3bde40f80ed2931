//! Rift is a tree-walking interpreter for a small dynamically typed,
//! class-based scripting language in the Lox family.
//!
//! The pipeline is four stages, each producing input for the next:
//!
//! 1. [`scanner`] turns source text into a token stream, accumulating
//!    recoverable [`error::ScanError`]s rather than stopping at the first
//!    bad character.
//! 2. [`parser`] turns tokens into an AST of [`stmt::Stmt`]/[`expr::Expr`]
//!    nodes, synchronizing past [`error::ParseError`]s so a single run can
//!    surface more than one syntax mistake.
//! 3. [`resolver`] statically computes, for every name-bearing expression,
//!    how many enclosing lexical frames separate its use from its binding;
//!    that depth table is what lets closures and `this`/`super` resolve
//!    correctly without a dynamic scope lookup.
//! 4. [`interpreter`] walks the AST against a persistent [`environment`]
//!    frame chain, producing side effects (`print`, runtime errors) and
//!    dispatching calls, method lookups, and `super` chains.
//!
//! [`Rift`] drives one [`interpreter::Interpreter`] across a whole process,
//! so a REPL session's turns share the same globals frame.

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::fs;

use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Process-level exit codes, following the BSD `sysexits.h` convention the
/// teacher crate also uses.
pub mod exit_code {
    pub const OK: i32 = 0;
    pub const USAGE: i32 = 64;
    pub const DATA_ERROR: i32 = 65;
    pub const NO_INPUT: i32 = 66;
    pub const SOFTWARE: i32 = 70;
}

/// Owns the one [`Interpreter`] instance that persists across an entire
/// process invocation. A fresh [`Parser`]/[`Resolver`] pair is created per
/// run, but they share this interpreter's globals frame, which is what lets
/// a REPL's later turns see definitions made by earlier ones.
pub struct Rift {
    interpreter: Interpreter,
}

impl Rift {
    pub fn new() -> Self {
        Rift { interpreter: Interpreter::new() }
    }

    /// Reads and runs a source file. Returns the process exit code: `NO_INPUT`
    /// if the file cannot be read, `DATA_ERROR`/`SOFTWARE` if the run failed,
    /// `OK` otherwise.
    pub fn run_file(&mut self, path: &str) -> i32 {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(_) => {
                eprintln!("rift: file not found: {path}");
                return exit_code::NO_INPUT;
            }
        };

        self.run(&source)
    }

    /// Runs one chunk of source text through the full pipeline, stopping at
    /// the first stage that records an error. Returns the exit code that
    /// stage's failure corresponds to, or `OK` on a clean run.
    pub fn run(&mut self, source: &str) -> i32 {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        if !scan_errors.is_empty() {
            for error in &scan_errors {
                eprintln!("{error}");
            }
            return exit_code::DATA_ERROR;
        }

        let (statements, parse_errors) = Parser::new(tokens).parse();
        if !parse_errors.is_empty() {
            for error in &parse_errors {
                eprintln!("{error}");
            }
            return exit_code::DATA_ERROR;
        }

        let resolve_errors = Resolver::new(&mut self.interpreter).resolve(&statements);
        if !resolve_errors.is_empty() {
            for error in &resolve_errors {
                eprintln!("{error}");
            }
            return exit_code::DATA_ERROR;
        }

        match self.interpreter.interpret(&statements) {
            Ok(()) => exit_code::OK,
            Err(error) => {
                eprintln!("{error}");
                exit_code::SOFTWARE
            }
        }
    }
}

impl Default for Rift {
    fn default() -> Self {
        Self::new()
    }
}
