use lachs::Span;

use super::NodeId;
use super::statement::{Block, Statement};

#[derive(Debug, Clone)]
pub enum Expression {
    Boolean(Boolean),
    Number(Number),
    String(StringLiteral),
    Null(Null),
    Ident(Ident),
    Call(Call),
    Function(Function),
    Binary(Binary),
    Object(Object),
}

impl Expression {
    pub fn id(&self) -> NodeId {
        match self {
            Expression::Boolean(b) => b.id,
            Expression::Number(n) => n.id,
            Expression::String(s) => s.id,
            Expression::Null(n) => n.id,
            Expression::Ident(i) => i.id,
            Expression::Call(c) => c.id,
            Expression::Function(f) => f.id,
            Expression::Binary(b) => b.id,
            Expression::Object(o) => o.id,
        }
    }

    pub fn position(&self) -> &Span {
        match self {
            Expression::Boolean(b) => &b.position,
            Expression::Number(n) => &n.position,
            Expression::String(s) => &s.position,
            Expression::Null(n) => &n.position,
            Expression::Ident(i) => &i.position,
            Expression::Call(c) => &c.position,
            Expression::Function(f) => &f.position,
            Expression::Binary(b) => &b.position,
            Expression::Object(o) => &o.position,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ident {
    pub value: String,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Boolean {
    pub value: bool,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Number {
    pub value: i64,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub value: String,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Null {
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub callee: Box<Expression>,
    pub args: Vec<Expression>,
    pub id: NodeId,
    pub position: Span,
}

/// Arrow function or function declaration. Only declarations carry a name.
#[derive(Debug, Clone)]
pub struct Function {
    pub name: Option<Ident>,
    pub params: Vec<Ident>,
    pub body: FunctionBody,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Expression(Box<Expression>),
    Block(Block),
}

impl Function {
    /// Whether the body hands back a value through `return`. Nested functions
    /// are not searched.
    pub fn returns_value(&self) -> bool {
        fn search(statements: &[Statement]) -> bool {
            statements.iter().any(|statement| match statement {
                Statement::Return(_) => true,
                Statement::Block(block) => search(&block.body),
                _ => false,
            })
        }

        match &self.body {
            FunctionBody::Expression(_) => true,
            FunctionBody::Block(block) => search(&block.body),
        }
    }
}

/// Binary operator kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
            BinOpKind::Eq => "==",
            BinOpKind::NotEq => "!=",
            BinOpKind::StrictEq => "===",
            BinOpKind::StrictNotEq => "!==",
            BinOpKind::Lt => "<",
            BinOpKind::Gt => ">",
            BinOpKind::LtEq => "<=",
            BinOpKind::GtEq => ">=",
            BinOpKind::And => "&&",
            BinOpKind::Or => "||",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Binary {
    pub op: BinOpKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Object {
    pub properties: Vec<Property>,
    pub id: NodeId,
    pub position: Span,
}

/// `key: value` inside an object literal
#[derive(Debug, Clone)]
pub struct Property {
    pub key: Ident,
    pub value: Expression,
    pub id: NodeId,
    pub position: Span,
}
