use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{ExecResult, RuntimeError, Signal};
use crate::expr::*;
use crate::function::{Function, NativeFunction};
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, TokenKind};

/// The tree-walking evaluator. Owns the globals frame for its whole
/// lifetime (so a REPL's turns share definitions) and the depth side-table
/// the resolver writes into before each `interpret` call.
pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
}

impl Interpreter {
    pub fn new() -> Self {
        let globals = Rc::new(RefCell::new(Environment::default()));
        for native in NativeFunction::builtins() {
            let name = native.name.clone();
            globals.borrow_mut().define(&name, Object::NativeFunction(Rc::new(native)));
        }

        Interpreter { environment: Rc::clone(&globals), globals, locals: HashMap::new() }
    }

    /// Records the lexical distance the resolver computed for a name-bearing
    /// expression, keyed by that expression's parse-time identity.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Runs a whole program against the persistent environment. On a
    /// runtime error, the current frame is reset back to globals so a
    /// subsequent REPL turn starts clean; definitions made before the
    /// failing statement remain visible since they live in `globals` itself.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                self.environment = Rc::clone(&self.globals);
                return Err(error);
            }
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        expr.accept(self)
    }

    /// Executes a block's statements under a fresh frame, restoring the
    /// previous frame on every exit path (normal completion, a `return`
    /// signal, or a propagated runtime error).
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(None);
        for statement in statements {
            match self.execute(statement) {
                Ok(None) => {}
                Ok(Some(signal)) => {
                    result = Ok(Some(signal));
                    break;
                }
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&mut self, id: ExprId, name: &Token) -> Result<Object, RuntimeError> {
        match self.locals.get(&id) {
            Some(&distance) => Environment::get_at(&self.environment, distance, name),
            None => self.globals.borrow().get(name),
        }
    }

    fn check_number_operand(operator: &Token, operand: &Object) -> Result<f64, RuntimeError> {
        match operand {
            Object::Number(n) => Ok(*n),
            _ => Err(RuntimeError { token: operator.clone(), message: "operand must be a number".to_string() }),
        }
    }

    fn check_number_operands(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), RuntimeError> {
        match (left, right) {
            (Object::Number(l), Object::Number(r)) => Ok((*l, *r)),
            _ => Err(RuntimeError { token: operator.clone(), message: "operands must be numbers".to_string() }),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExprVisitor<Result<Object, RuntimeError>> for Interpreter {
    fn visit_literal_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Literal(data) = expr else { unreachable!() };
        Ok(Object::from(&data.value))
    }

    fn visit_grouping_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Grouping(data) = expr else { unreachable!() };
        self.evaluate(&data.expression)
    }

    fn visit_unary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Unary(data) = expr else { unreachable!() };
        let right = self.evaluate(&data.right)?;

        match data.operator.kind {
            TokenKind::Minus => Ok(Object::Number(-Self::check_number_operand(&data.operator, &right)?)),
            TokenKind::Bang => Ok(Object::Bool(!right.is_truthy())),
            _ => unreachable!("scanner/parser only produce '-' and '!' as unary operators"),
        }
    }

    fn visit_binary_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Binary(data) = expr else { unreachable!() };
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let operator = &data.operator;

        match operator.kind {
            TokenKind::Plus => match (&left, &right) {
                (Object::Number(l), Object::Number(r)) => Ok(Object::Number(l + r)),
                (Object::String(l), Object::String(r)) => Ok(Object::String(format!("{l}{r}"))),
                _ => Err(RuntimeError {
                    token: operator.clone(),
                    message: "operands must be two numbers or two strings".to_string(),
                }),
            },
            TokenKind::Minus => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Number(l - r))
            }
            TokenKind::Star => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Number(l * r))
            }
            TokenKind::Slash => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                if r == 0.0 {
                    return Err(RuntimeError { token: operator.clone(), message: "division by zero".to_string() });
                }
                Ok(Object::Number(l / r))
            }
            TokenKind::Percent => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                if r == 0.0 {
                    return Err(RuntimeError { token: operator.clone(), message: "modulo by zero".to_string() });
                }
                Ok(Object::Number(l % r))
            }
            TokenKind::Greater => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Bool(l > r))
            }
            TokenKind::GreaterEqual => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Bool(l >= r))
            }
            TokenKind::Less => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Bool(l < r))
            }
            TokenKind::LessEqual => {
                let (l, r) = Self::check_number_operands(operator, &left, &right)?;
                Ok(Object::Bool(l <= r))
            }
            TokenKind::EqualEqual => Ok(Object::Bool(left == right)),
            TokenKind::BangEqual => Ok(Object::Bool(left != right)),
            _ => unreachable!("scanner/parser only produce these kinds as binary operators"),
        }
    }

    fn visit_logical_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Logical(data) = expr else { unreachable!() };
        let left = self.evaluate(&data.left)?;

        let short_circuits = if data.operator.kind == TokenKind::Or { left.is_truthy() } else { !left.is_truthy() };

        if short_circuits {
            Ok(left)
        } else {
            self.evaluate(&data.right)
        }
    }

    fn visit_variable_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Variable(data) = expr else { unreachable!() };
        self.lookup_variable(data.id, &data.name)
    }

    fn visit_assign_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Assign(data) = expr else { unreachable!() };
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&distance) => Environment::assign_at(&self.environment, distance, &data.name, value.clone())?,
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Call(data) = expr else { unreachable!() };

        let callee = self.evaluate(&data.callee)?;
        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Function(function) => function.arity(),
            Object::NativeFunction(function) => function.arity(),
            Object::Class(class) => class.arity(),
            _ => {
                return Err(RuntimeError {
                    token: data.paren.clone(),
                    message: "can only call functions and classes".to_string(),
                })
            }
        };

        if arguments.len() != arity {
            return Err(RuntimeError {
                token: data.paren.clone(),
                message: format!("expected {} arguments but got {}", arity, arguments.len()),
            });
        }

        match &callee {
            Object::Function(function) => function.call(self, arguments),
            Object::NativeFunction(function) => function.call(self, arguments),
            Object::Class(class) => Class::instantiate(class, self, arguments),
            _ => unreachable!("non-callable variants already rejected above"),
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Get(data) = expr else { unreachable!() };
        let object = self.evaluate(&data.object)?;

        match object {
            Object::Instance(instance) => Instance::get(&instance, &data.name),
            _ => Err(RuntimeError { token: data.name.clone(), message: "only instances have properties".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Set(data) = expr else { unreachable!() };
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(RuntimeError { token: data.name.clone(), message: "only instances have fields".to_string() });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::This(data) = expr else { unreachable!() };
        self.lookup_variable(data.id, &data.keyword)
    }

    fn visit_super_expr(&mut self, expr: &Expr) -> Result<Object, RuntimeError> {
        let Expr::Super(data) = expr else { unreachable!() };

        let distance = *self.locals.get(&data.id).ok_or_else(|| RuntimeError {
            token: data.keyword.clone(),
            message: "unresolved 'super' expression".to_string(),
        })?;

        let superclass = Environment::get_at_str(&self.environment, distance, "super")
            .and_then(|value| if let Object::Class(class) = value { Some(class) } else { None })
            .ok_or_else(|| RuntimeError { token: data.keyword.clone(), message: "'super' is not bound to a class".to_string() })?;

        // 'this' is always bound one frame inside 'super' (see Class stmt semantics).
        let instance = Environment::get_at_str(&self.environment, distance - 1, "this")
            .ok_or_else(|| RuntimeError { token: data.keyword.clone(), message: "'this' is not bound".to_string() })?;

        let method = superclass
            .find_method(&data.method.lexeme)
            .ok_or_else(|| RuntimeError { token: data.method.clone(), message: format!("undefined property '{}'", data.method.lexeme) })?;

        Ok(Object::Function(Rc::new(method.bind(instance))))
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.evaluate(&data.expression)?;
        Ok(None)
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Print(data) = stmt else { unreachable!() };
        let value = self.evaluate(&data.expression)?;
        println!("{}", value.stringify());
        Ok(None)
    }

    fn visit_let_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Let(data) = stmt else { unreachable!() };
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Nil,
        };
        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(None)
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Block(data) = stmt else { unreachable!() };
        let environment = Environment::new(Some(Rc::clone(&self.environment)));
        self.execute_block(&data.statements, Rc::new(RefCell::new(environment)))
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::If(data) = stmt else { unreachable!() };

        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(None)
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::While(data) = stmt else { unreachable!() };

        while self.evaluate(&data.condition)?.is_truthy() {
            if let Some(signal) = self.execute(&data.body)? {
                return Ok(Some(signal));
            }
        }
        Ok(None)
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Function(declaration) = stmt else { unreachable!() };
        let function = Function::new(Rc::clone(declaration), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&declaration.name.lexeme, Object::Function(Rc::new(function)));
        Ok(None)
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Return(data) = stmt else { unreachable!() };
        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::Nil,
        };
        Ok(Some(Signal::Return(value)))
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) -> ExecResult {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let superclass = match &data.superclass {
            Some(superclass_expr) => match self.evaluate(superclass_expr)? {
                Object::Class(class) => Some(class),
                _ => {
                    let Expr::Variable(variable) = superclass_expr else { unreachable!() };
                    return Err(RuntimeError { token: variable.name.clone(), message: "superclass must be a class".to_string() });
                }
            },
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::Nil);

        if let Some(superclass) = &superclass {
            let mut super_environment = Environment::new(Some(Rc::clone(&self.environment)));
            super_environment.define("super", Object::Class(Rc::clone(superclass)));
            self.environment = Rc::new(RefCell::new(super_environment));
        }

        let mut methods = HashMap::new();
        for method in &data.methods {
            let is_initializer = method.name.lexeme == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&self.environment), is_initializer);
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = Rc::new(Class::new(data.name.lexeme.clone(), superclass.clone(), methods));

        if superclass.is_some() {
            let enclosing = self.environment.borrow().enclosing.clone().expect("super frame has an enclosing frame");
            self.environment = enclosing;
        }

        self.environment.borrow_mut().assign(&data.name, Object::Class(class))?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::token::Location;

    fn operator(kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme.to_string(), None, Location::new(1, 1))
    }

    fn number(n: f64) -> Expr {
        Expr::Literal(LiteralData { id: 1, value: Literal::Number(n) })
    }

    #[test]
    fn evaluates_a_literal() {
        let mut interpreter = Interpreter::new();
        assert_eq!(interpreter.evaluate(&number(12.0)).unwrap(), Object::Number(12.0));
    }

    #[test]
    fn evaluates_unary_minus() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Unary(UnaryData { id: 2, operator: operator(TokenKind::Minus, "-"), right: Box::new(number(12.0)) });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(-12.0));
    }

    #[test]
    fn evaluates_binary_subtraction() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(BinaryData {
            id: 3,
            left: Box::new(number(12.0)),
            operator: operator(TokenKind::Minus, "-"),
            right: Box::new(number(12.0)),
        });
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Object::Number(0.0));
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let mut interpreter = Interpreter::new();
        let expr = Expr::Binary(BinaryData {
            id: 4,
            left: Box::new(number(1.0)),
            operator: operator(TokenKind::Slash, "/"),
            right: Box::new(number(0.0)),
        });
        let error = interpreter.evaluate(&expr).unwrap_err();
        assert_eq!(error.message, "division by zero");
    }
}
