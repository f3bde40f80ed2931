use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{RuntimeError, Signal};
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::stmt::FunctionDecl;
use crate::token::Token;

/// A user-defined function value: its declaration, the frame it closed
/// over, and whether it is a class initializer (which always yields `this`
/// instead of its declared return value).
#[derive(Debug)]
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    pub is_initializer: bool,
}

impl Callable for Function {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, arg) in self.declaration.params.iter().zip(arguments.into_iter()) {
            environment.define(&param.lexeme, arg);
        }

        let environment = Rc::new(RefCell::new(environment));
        let signal = interpreter.execute_block(&self.declaration.body, environment)?;

        if self.is_initializer {
            return Ok(Environment::get_at_str(&self.closure, 0, "this")
                .expect("initializer closures always bind 'this' one frame in"));
        }

        match signal {
            Some(Signal::Return(value)) => Ok(value),
            None => Ok(Object::Nil),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        Function { declaration, closure, is_initializer }
    }

    /// Wraps this function's closure in a fresh frame binding `this` to
    /// `instance`, producing the bound method returned by property access.
    pub fn bind(&self, instance: Object) -> Function {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", instance);
        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(environment)),
            is_initializer: self.is_initializer,
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A host-provided built-in. Unlike `Function`, its body is a Rust closure
/// rather than an interpreted one. `token` has no real source position; it
/// only gives the native's own errors (e.g. `len()` on a non-string) a
/// `Token` to attach to.
pub struct NativeFunction {
    pub name: String,
    pub token: Token,
    pub arity: usize,
    pub function: fn(&mut Interpreter, &Token, Vec<Object>) -> Result<Object, RuntimeError>,
}

impl Callable for NativeFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, RuntimeError> {
        (self.function)(interpreter, &self.token, arguments)
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl NativeFunction {
    pub fn new(
        name: &str,
        arity: usize,
        function: fn(&mut Interpreter, &Token, Vec<Object>) -> Result<Object, RuntimeError>,
    ) -> Self {
        NativeFunction { name: name.to_string(), token: Token::from(name), arity, function }
    }

    /// The built-ins defined in the globals frame before any user code runs.
    pub fn builtins() -> Vec<NativeFunction> {
        vec![
            NativeFunction::new("clock", 0, |_, _, _| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or(std::time::Duration::ZERO);
                Ok(Object::Number(now.as_secs_f64()))
            }),
            NativeFunction::new("len", 1, |_, token, args| match &args[0] {
                Object::String(s) => Ok(Object::Number(s.chars().count() as f64)),
                other => Err(RuntimeError {
                    token: token.clone(),
                    message: format!("len() argument must be a string, got {}", other.type_name()),
                }),
            }),
            NativeFunction::new("str", 1, |_, _, args| Ok(Object::String(args[0].stringify()))),
            NativeFunction::new("num", 1, |_, token, args| match &args[0] {
                Object::String(s) => s.trim().parse::<f64>().map(Object::Number).map_err(|_| RuntimeError {
                    token: token.clone(),
                    message: format!("cannot convert '{s}' to a number"),
                }),
                other => Err(RuntimeError {
                    token: token.clone(),
                    message: format!("num() argument must be a string, got {}", other.type_name()),
                }),
            }),
            NativeFunction::new("input", 1, |_, _, args| {
                print!("{}", args[0].stringify());
                std::io::Write::flush(&mut std::io::stdout()).ok();
                let mut line = String::new();
                std::io::stdin().read_line(&mut line).ok();
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Ok(Object::String(line))
            }),
            NativeFunction::new("type", 1, |_, _, args| Ok(Object::String(args[0].type_name()))),
        ]
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}

impl Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.name)
    }
}
