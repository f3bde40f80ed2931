use std::rc::Rc;

use crate::error::ParseError;
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, TokenKind};

type ParseResult<T> = Result<T, ParseError>;

/// The arity cap named by the language: a 256th parameter or argument is
/// diagnosed but does not stop parsing.
const MAX_ARITY: usize = 255;

/// Recursive-descent parser. Turns a token list into a statement list plus
/// any accumulated parse errors; never panics on malformed input.
///
/// ```text
/// program     -> declaration* EOF
/// declaration -> classDecl | funDecl | letDecl | statement
/// classDecl   -> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}"
/// funDecl     -> "fn" function
/// letDecl     -> "let" IDENTIFIER ( "=" expression )? ";"
/// function    -> IDENTIFIER "(" parameters? ")" block
/// statement   -> exprStmt | forStmt | ifStmt | printStmt | returnStmt | whileStmt | block
/// exprStmt    -> expression ";"
/// forStmt     -> "for" "(" ( letDecl | exprStmt | ";" ) expression? ";" expression? ")" statement
/// ifStmt      -> "if" "(" expression ")" statement ( "else" statement )?
/// printStmt   -> "print" expression ";"
/// returnStmt  -> "return" expression? ";"
/// whileStmt   -> "while" "(" expression ")" statement
/// expression  -> assignment
/// assignment  -> ( call "." )? IDENTIFIER "=" assignment | logic_or
/// logic_or    -> logic_and ( "or" logic_and )*
/// logic_and   -> equality ( "and" equality )*
/// equality    -> comparison ( ( "!=" | "==" ) comparison )*
/// comparison  -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term        -> factor ( ( "+" | "-" ) factor )*
/// factor      -> unary ( ( "*" | "/" | "%" ) unary )*
/// unary       -> ( "!" | "-" ) unary | call
/// call        -> primary ( "(" arguments? ")" | "." IDENTIFIER )*
/// primary     -> NUMBER | STRING | "true" | "false" | "nil" | "this"
///              | "super" "." IDENTIFIER | IDENTIFIER | "(" expression ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
    next_id: ExprId,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, current: 0, errors: Vec::new(), next_id: 0 }
    }

    /// Parses the whole token list. Never fails outright: the caller
    /// inspects the returned error list to decide whether to proceed.
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<ParseError>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        (statements, self.errors)
    }

    fn next_id(&mut self) -> ExprId {
        self.next_id += 1;
        self.next_id
    }

    // --- token stream primitives ---

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn match_kind(&mut self, kinds: &[TokenKind]) -> bool {
        for &kind in kinds {
            if self.check(kind) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<&Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(ParseError { token: self.peek().clone(), message: message.to_string() })
    }

    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.peek().kind {
                TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Let
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // --- declarations ---

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_kind(&[TokenKind::Class]) {
            self.class_declaration()
        } else if self.match_kind(&[TokenKind::Fn]) {
            self.function_declaration("function").map(Stmt::Function)
        } else if self.match_kind(&[TokenKind::Let]) {
            self.let_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "expect class name")?.clone();

        let superclass = if self.match_kind(&[TokenKind::Less]) {
            self.consume(TokenKind::Identifier, "expect superclass name")?;
            let id = self.next_id();
            Some(Expr::Variable(VariableData { id, name: self.previous().clone() }))
        } else {
            None
        };

        self.consume(TokenKind::LeftBrace, "expect '{' before class body")?;

        let mut methods = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            methods.push(self.function_declaration("method")?);
        }

        self.consume(TokenKind::RightBrace, "expect '}' after class body")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    fn function_declaration(&mut self, kind: &str) -> ParseResult<Rc<FunctionDecl>> {
        let name = self.consume(TokenKind::Identifier, &format!("expect {kind} name"))?.clone();
        self.consume(TokenKind::LeftParen, &format!("expect '(' after {kind} name"))?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if params.len() == MAX_ARITY {
                    self.errors.push(ParseError {
                        token: self.peek().clone(),
                        message: "cannot have more than 256 parameters".to_string(),
                    });
                }
                params.push(self.consume(TokenKind::Identifier, "expect parameter name")?.clone());
                if !self.match_kind(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        self.consume(TokenKind::RightParen, "expect ')' after parameters")?;
        self.consume(TokenKind::LeftBrace, &format!("expect '{{' before {kind} body"))?;

        let body = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    fn let_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "expect variable name")?.clone();

        let initializer = if self.match_kind(&[TokenKind::Equal]) { Some(self.expression()?) } else { None };

        self.consume(TokenKind::Semicolon, "expect ';' after variable declaration")?;
        Ok(Stmt::Let(LetData { name, initializer }))
    }

    // --- statements ---

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.match_kind(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.match_kind(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.match_kind(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.match_kind(&[TokenKind::Return]) {
            return self.return_statement();
        }
        if self.match_kind(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.match_kind(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(BlockData { statements: self.block()? }));
        }
        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "expect '(' after 'for'")?;

        let initializer = if self.match_kind(&[TokenKind::Semicolon]) {
            None
        } else if self.match_kind(&[TokenKind::Let]) {
            Some(self.let_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenKind::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "expect ';' after loop condition")?;

        let increment = if !self.check(TokenKind::RightParen) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::RightParen, "expect ')' after loop clauses")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData { statements: vec![body, Stmt::Expression(ExpressionData { expression: increment })] });
        }

        let condition = condition.unwrap_or_else(|| {
            let id = self.next_id();
            Expr::Literal(LiteralData { id, value: Literal::Bool(true) })
        });
        body = Stmt::While(WhileData { condition, body: Box::new(body) });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "expect '(' after 'if'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "expect ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_kind(&[TokenKind::Else]) { Some(Box::new(self.statement()?)) } else { None };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "expect ';' after value")?;
        Ok(Stmt::Print(PrintData { expression }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if !self.check(TokenKind::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(TokenKind::Semicolon, "expect ';' after return value")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "expect '(' after 'while'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "expect ')' after condition")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While(WhileData { condition, body }))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(TokenKind::RightBrace, "expect '}' after block")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.consume(TokenKind::Semicolon, "expect ';' after expression")?;
        Ok(Stmt::Expression(ExpressionData { expression }))
    }

    // --- expressions ---

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.match_kind(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(data) => {
                    let id = self.next_id();
                    Ok(Expr::Assign(AssignData { id, name: data.name, value: Box::new(value) }))
                }
                Expr::Get(data) => {
                    let id = self.next_id();
                    Ok(Expr::Set(SetData { id, object: data.object, name: data.name, value: Box::new(value) }))
                }
                other => {
                    self.errors.push(ParseError { token: equals, message: "invalid assignment target".to_string() });
                    Ok(other)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.match_kind(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            let id = self.next_id();
            expr = Expr::Logical(LogicalData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_kind(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            let id = self.next_id();
            expr = Expr::Logical(LogicalData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.match_kind(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            let id = self.next_id();
            expr = Expr::Binary(BinaryData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.match_kind(&[TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            let id = self.next_id();
            expr = Expr::Binary(BinaryData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_kind(&[TokenKind::Minus, TokenKind::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            let id = self.next_id();
            expr = Expr::Binary(BinaryData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_kind(&[TokenKind::Slash, TokenKind::Star, TokenKind::Percent]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            let id = self.next_id();
            expr = Expr::Binary(BinaryData { id, left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_kind(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            let id = self.next_id();
            return Ok(Expr::Unary(UnaryData { id, operator, right: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() == MAX_ARITY {
                    self.errors.push(ParseError {
                        token: self.peek().clone(),
                        message: "cannot have more than 256 arguments".to_string(),
                    });
                }
                arguments.push(self.expression()?);
                if !self.match_kind(&[TokenKind::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "expect ')' after arguments")?.clone();
        let id = self.next_id();
        Ok(Expr::Call(CallData { id, callee: Box::new(callee), arguments, paren }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.match_kind(&[TokenKind::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.match_kind(&[TokenKind::Dot]) {
                let name = self.consume(TokenKind::Identifier, "expect property name after '.'")?.clone();
                let id = self.next_id();
                expr = Expr::Get(GetData { id, object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_kind(&[TokenKind::False]) {
            let id = self.next_id();
            return Ok(Expr::Literal(LiteralData { id, value: Literal::Bool(false) }));
        }
        if self.match_kind(&[TokenKind::True]) {
            let id = self.next_id();
            return Ok(Expr::Literal(LiteralData { id, value: Literal::Bool(true) }));
        }
        if self.match_kind(&[TokenKind::Nil]) {
            let id = self.next_id();
            return Ok(Expr::Literal(LiteralData { id, value: Literal::Nil }));
        }
        if self.match_kind(&[TokenKind::Number, TokenKind::String]) {
            let value = self.previous().literal.clone().expect("number or string token to carry a literal");
            let id = self.next_id();
            return Ok(Expr::Literal(LiteralData { id, value }));
        }
        if self.match_kind(&[TokenKind::Super]) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Dot, "expect '.' after 'super'")?;
            let method = self.consume(TokenKind::Identifier, "expect superclass method name")?.clone();
            let id = self.next_id();
            return Ok(Expr::Super(SuperData { id, keyword, method }));
        }
        if self.match_kind(&[TokenKind::This]) {
            let id = self.next_id();
            return Ok(Expr::This(ThisData { id, keyword: self.previous().clone() }));
        }
        if self.match_kind(&[TokenKind::Identifier]) {
            let id = self.next_id();
            return Ok(Expr::Variable(VariableData { id, name: self.previous().clone() }));
        }
        if self.match_kind(&[TokenKind::LeftParen]) {
            let expression = self.expression()?;
            self.consume(TokenKind::RightParen, "expect ')' after expression")?;
            let id = self.next_id();
            return Ok(Expr::Grouping(GroupingData { id, expression: Box::new(expression) }));
        }

        Err(ParseError { token: self.peek().clone(), message: "expect expression".to_string() })
    }
}
