use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::object::Object;
use crate::token::Token;

/// A single frame in the lexical scope chain: a map from name to value, with
/// a pointer to the enclosing frame. The outermost frame with no enclosing
/// frame is the globals frame.
#[derive(Debug)]
pub struct Environment {
    pub enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }
        Err(RuntimeError {
            token: name.clone(),
            message: format!("undefined variable '{}'", name.lexeme),
        })
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), RuntimeError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }
        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }
        Err(RuntimeError {
            token: name.clone(),
            message: format!("undefined variable '{}'", name.lexeme),
        })
    }

    fn ancestor(env: &Rc<RefCell<Environment>>, distance: usize) -> Result<Rc<RefCell<Environment>>, String> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.clone();
            match next {
                Some(parent) => current = parent,
                None => return Err("resolved scope distance exceeds the environment chain".to_string()),
            }
        }
        Ok(current)
    }

    /// Reads a name at an exact lexical distance, as computed by the
    /// resolver. A failure here indicates a resolver/evaluator bug rather
    /// than a user error, since the resolver only ever records a distance
    /// it proved resolves to a real enclosing frame.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token) -> Result<Object, RuntimeError> {
        let frame = Self::ancestor(env, distance).map_err(|message| RuntimeError { token: name.clone(), message })?;
        let frame = frame.borrow();
        frame.values.get(&name.lexeme).cloned().ok_or_else(|| RuntimeError {
            token: name.clone(),
            message: format!("undefined variable '{}'", name.lexeme),
        })
    }

    pub fn assign_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &Token, value: Object) -> Result<(), RuntimeError> {
        let frame = Self::ancestor(env, distance).map_err(|message| RuntimeError { token: name.clone(), message })?;
        frame.borrow_mut().values.insert(name.lexeme.clone(), value);
        Ok(())
    }

    /// Reads a name at an exact lexical distance by plain string, used for
    /// the interpreter's own `"this"`/`"super"` lookups where there is no
    /// source token to attach to an error.
    pub fn get_at_str(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Object> {
        let frame = Self::ancestor(env, distance).ok()?;
        let frame = frame.borrow();
        frame.values.get(name).cloned()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(None)
    }
}
