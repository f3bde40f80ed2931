use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::function::Function;
use crate::interpreter::Interpreter;
use crate::object::{Callable, Object};
use crate::token::Token;

/// A class value: its name, optional superclass, and its own method map
/// (inheritance walks the superclass chain rather than flattening methods
/// into a single table).
#[derive(Debug)]
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    pub methods: HashMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(name: String, superclass: Option<Rc<Class>>, methods: HashMap<String, Rc<Function>>) -> Self {
        Class { name, superclass, methods }
    }

    /// Checks this class's own methods first, then recurses into the
    /// superclass chain.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass.as_ref().and_then(|superclass| superclass.find_method(name))
    }

    /// A class's arity is its initializer's, or zero if it declares none.
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Instantiates this class, running its initializer (if any) against
    /// the new instance. Takes `self` as an `Rc` rather than implementing
    /// `Callable` directly, since the instance must hold the same class
    /// identity the caller dispatched through, not a fresh copy of it.
    pub fn instantiate(
        class: &Rc<Class>,
        interpreter: &mut Interpreter,
        arguments: Vec<Object>,
    ) -> Result<Object, RuntimeError> {
        let instance = Rc::new(RefCell::new(Instance::new(Rc::clone(class))));

        if let Some(initializer) = class.find_method("init") {
            let bound = initializer.bind(Object::Instance(Rc::clone(&instance)));
            bound.call(interpreter, arguments)?;
        }

        Ok(Object::Instance(instance))
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class {}>", self.name)
    }
}

/// A mutable record: a class reference plus a field map. Fields shadow
/// methods of the same name on property read.
#[derive(Debug)]
pub struct Instance {
    pub class: Rc<Class>,
    pub fields: HashMap<String, Object>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Instance { class, fields: HashMap::new() }
    }

    /// Reads a property: a field if one exists, else a method bound to
    /// this instance.
    pub fn get(this: &Rc<RefCell<Instance>>, name: &Token) -> Result<Object, RuntimeError> {
        let instance = this.borrow();

        if let Some(value) = instance.fields.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(method) = instance.class.find_method(&name.lexeme) {
            let bound = method.bind(Object::Instance(Rc::clone(this)));
            return Ok(Object::Function(Rc::new(bound)));
        }

        Err(RuntimeError { token: name.clone(), message: format!("undefined property '{}'", name.lexeme) })
    }

    pub fn set(&mut self, name: &Token, value: Object) {
        self.fields.insert(name.lexeme.clone(), value);
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<instance {}>", self.class.name)
    }
}
