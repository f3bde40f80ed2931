use std::fmt::{self, Display};

use crate::object::Object;
use crate::token::{Location, Token};

/// A recoverable scan-time error. Accumulated by the scanner; scanning
/// continues past the offending character.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub location: Location,
    pub message: String,
}

impl Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}, col {}] Scan error: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

/// A recoverable parse-time error. Also reused by the resolver for
/// scope/name/initializer violations, matching `original_source`'s reuse of
/// a single error type across both static-analysis stages.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Parse error at '{}': {}",
            self.token.location.line, self.token.lexeme, self.message
        )
    }
}

/// A fatal runtime error. Unwinds the evaluator and is reported; the run
/// that produced it aborts, but a REPL's subsequent turns continue from a
/// clean evaluator state.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {}] Runtime error: {}",
            self.token.location.line, self.message
        )
    }
}

/// The control-flow signal threaded through statement execution. `Return`
/// carries a value out of arbitrarily nested blocks without being an error;
/// it is produced only by a `return` statement and consumed by the call
/// frame that invoked the enclosing function.
#[derive(Debug, Clone)]
pub enum Signal {
    Return(Object),
}

/// Either a fatal runtime error or a return unwinding out of the current
/// statement. Every statement-execution function returns this so that a
/// `return` nested inside blocks, ifs, and whiles can propagate without
/// panicking or relying on exceptions.
pub type ExecResult = Result<Option<Signal>, RuntimeError>;
