use crate::literal::Literal;
use crate::token::Token;

/// Unique identity assigned to every expression node at parse time. The
/// resolver's depth side-table is keyed by this rather than by token or
/// structural equality, since the same name can appear in many expressions
/// that must resolve to different frames.
pub type ExprId = u64;

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub id: ExprId,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub id: ExprId,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LiteralData {
    pub id: ExprId,
    pub value: Literal,
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub id: ExprId,
    pub expression: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub id: ExprId,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub id: ExprId,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub id: ExprId,
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub id: ExprId,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub paren: Token,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub id: ExprId,
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub id: ExprId,
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ThisData {
    pub id: ExprId,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub id: ExprId,
    pub keyword: Token,
    pub method: Token,
}

/// An expression node. Each variant carries its own `*Data` struct so that
/// visitors can match on the variant and still destructure the fields
/// without repeating them on the enum itself.
#[derive(Debug, Clone)]
pub enum Expr {
    Binary(BinaryData),
    Unary(UnaryData),
    Literal(LiteralData),
    Grouping(GroupingData),
    Variable(VariableData),
    Assign(AssignData),
    Logical(LogicalData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

impl Expr {
    pub fn id(&self) -> ExprId {
        match self {
            Expr::Binary(data) => data.id,
            Expr::Unary(data) => data.id,
            Expr::Literal(data) => data.id,
            Expr::Grouping(data) => data.id,
            Expr::Variable(data) => data.id,
            Expr::Assign(data) => data.id,
            Expr::Logical(data) => data.id,
            Expr::Call(data) => data.id,
            Expr::Get(data) => data.id,
            Expr::Set(data) => data.id,
            Expr::This(data) => data.id,
            Expr::Super(data) => data.id,
        }
    }

    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Binary(_) => visitor.visit_binary_expr(self),
            Expr::Unary(_) => visitor.visit_unary_expr(self),
            Expr::Literal(_) => visitor.visit_literal_expr(self),
            Expr::Grouping(_) => visitor.visit_grouping_expr(self),
            Expr::Variable(_) => visitor.visit_variable_expr(self),
            Expr::Assign(_) => visitor.visit_assign_expr(self),
            Expr::Logical(_) => visitor.visit_logical_expr(self),
            Expr::Call(_) => visitor.visit_call_expr(self),
            Expr::Get(_) => visitor.visit_get_expr(self),
            Expr::Set(_) => visitor.visit_set_expr(self),
            Expr::This(_) => visitor.visit_this_expr(self),
            Expr::Super(_) => visitor.visit_super_expr(self),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_binary_expr(&mut self, expr: &Expr) -> T;
    fn visit_unary_expr(&mut self, expr: &Expr) -> T;
    fn visit_literal_expr(&mut self, expr: &Expr) -> T;
    fn visit_grouping_expr(&mut self, expr: &Expr) -> T;
    fn visit_variable_expr(&mut self, expr: &Expr) -> T;
    fn visit_assign_expr(&mut self, expr: &Expr) -> T;
    fn visit_logical_expr(&mut self, expr: &Expr) -> T;
    fn visit_call_expr(&mut self, expr: &Expr) -> T;
    fn visit_get_expr(&mut self, expr: &Expr) -> T;
    fn visit_set_expr(&mut self, expr: &Expr) -> T;
    fn visit_this_expr(&mut self, expr: &Expr) -> T;
    fn visit_super_expr(&mut self, expr: &Expr) -> T;
}
