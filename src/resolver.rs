use std::collections::HashMap;
use std::mem;

use crate::error::ParseError;
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::stmt::*;
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Method,
    Initializer,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Static lexical-scope analysis. Walks the same AST the evaluator will
/// later walk, but only to compute how many enclosing frames separate each
/// name-bearing expression from its binding frame; that distance is written
/// into the [`Interpreter`]'s depth table rather than returned here, so one
/// `Interpreter` can be resolved against many times across a REPL session.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
    current_class: ClassKind,
    errors: Vec<ParseError>,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            errors: Vec::new(),
        }
    }

    /// Resolves a whole program, returning any accumulated errors. Globals
    /// are never pushed onto the scope stack, so a name that is never found
    /// locally is silently left for the evaluator to resolve via globals.
    pub fn resolve(mut self, statements: &[Stmt]) -> Vec<ParseError> {
        for statement in statements {
            self.resolve_stmt(statement);
        }
        self.errors
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        for stmt in &declaration.body {
            self.resolve_stmt(stmt);
        }
        self.end_scope();

        self.current_function = enclosing_function;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.errors.push(ParseError {
                token: name.clone(),
                message: format!("'{}' already declared in this scope", name.lexeme),
            });
        }
        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };
        scope.insert(name.lexeme.clone(), true);
    }

    /// Binds a name to the innermost scope it is declared in, recording the
    /// distance on the interpreter's depth table. Leaves no entry (and thus
    /// defers to globals) when the name is not found locally.
    fn resolve_local(&mut self, id: ExprId, name: &Token) {
        for (i, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(&name.lexeme) {
                self.interpreter.resolve(id, i);
                return;
            }
        }
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_binary_expr(&mut self, expr: &Expr) {
        let Expr::Binary(data) = expr else { unreachable!() };
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_unary_expr(&mut self, expr: &Expr) {
        let Expr::Unary(data) = expr else { unreachable!() };
        self.resolve_expr(&data.right);
    }

    fn visit_literal_expr(&mut self, _expr: &Expr) {}

    fn visit_grouping_expr(&mut self, expr: &Expr) {
        let Expr::Grouping(data) = expr else { unreachable!() };
        self.resolve_expr(&data.expression);
    }

    fn visit_variable_expr(&mut self, expr: &Expr) {
        let Expr::Variable(data) = expr else { unreachable!() };

        if let Some(scope) = self.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                self.errors.push(ParseError {
                    token: data.name.clone(),
                    message: "cannot read variable in its own initializer".to_string(),
                });
            }
        }

        self.resolve_local(data.id, &data.name);
    }

    fn visit_assign_expr(&mut self, expr: &Expr) {
        let Expr::Assign(data) = expr else { unreachable!() };
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name);
    }

    fn visit_logical_expr(&mut self, expr: &Expr) {
        let Expr::Logical(data) = expr else { unreachable!() };
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_call_expr(&mut self, expr: &Expr) {
        let Expr::Call(data) = expr else { unreachable!() };
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, expr: &Expr) {
        let Expr::Get(data) = expr else { unreachable!() };
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, expr: &Expr) {
        let Expr::Set(data) = expr else { unreachable!() };
        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_this_expr(&mut self, expr: &Expr) {
        let Expr::This(data) = expr else { unreachable!() };

        if self.current_class == ClassKind::None {
            self.errors.push(ParseError {
                token: data.keyword.clone(),
                message: "cannot use 'this' outside of a class".to_string(),
            });
            return;
        }

        self.resolve_local(data.id, &data.keyword);
    }

    fn visit_super_expr(&mut self, expr: &Expr) {
        let Expr::Super(data) = expr else { unreachable!() };

        match self.current_class {
            ClassKind::None => {
                self.errors.push(ParseError {
                    token: data.keyword.clone(),
                    message: "cannot use 'super' outside of a class".to_string(),
                });
                return;
            }
            ClassKind::Class => {
                self.errors.push(ParseError {
                    token: data.keyword.clone(),
                    message: "cannot use 'super' in a class with no superclass".to_string(),
                });
                return;
            }
            ClassKind::Subclass => {}
        }

        self.resolve_local(data.id, &data.keyword);
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_expression_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Expression(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.expression);
    }

    fn visit_print_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Print(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.expression);
    }

    fn visit_let_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Let(data) = stmt else { unreachable!() };
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_block_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Block(data) = stmt else { unreachable!() };
        self.begin_scope();
        for statement in &data.statements {
            self.resolve_stmt(statement);
        }
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, stmt: &Stmt) {
        let Stmt::If(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while_stmt(&mut self, stmt: &Stmt) {
        let Stmt::While(data) = stmt else { unreachable!() };
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.body);
    }

    fn visit_function_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Function(declaration) = stmt else { unreachable!() };
        self.declare(&declaration.name);
        self.define(&declaration.name);
        self.resolve_function(declaration, FunctionKind::Function);
    }

    fn visit_return_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Return(data) = stmt else { unreachable!() };

        if self.current_function == FunctionKind::None {
            self.errors.push(ParseError {
                token: data.keyword.clone(),
                message: "cannot return from top-level code".to_string(),
            });
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionKind::Initializer {
                self.errors.push(ParseError {
                    token: data.keyword.clone(),
                    message: "cannot return a value from an initializer".to_string(),
                });
            }
            self.resolve_expr(value);
        }
    }

    fn visit_class_stmt(&mut self, stmt: &Stmt) {
        let Stmt::Class(data) = stmt else { unreachable!() };

        let enclosing_class = mem::replace(&mut self.current_class, ClassKind::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            let Expr::Variable(superclass_data) = superclass else { unreachable!() };

            if superclass_data.name.lexeme == data.name.lexeme {
                self.errors.push(ParseError {
                    token: superclass_data.name.clone(),
                    message: "a class cannot inherit from itself".to_string(),
                });
            }

            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &data.methods {
            let kind = if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(method, kind);
        }

        self.end_scope();
        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
