use lachs::Span;

use super::NodeId;
use super::expression::{Expression, Function, Ident};

#[derive(Debug, Clone)]
pub enum Statement {
    Expression(ExpressionStatement),
    Declaration(VariableDeclaration),
    Function(Function),
    Block(Block),
    Return(ReturnStatement),
}

impl Statement {
    /// Names this statement introduces into its enclosing block.
    pub fn declared_names(&self) -> Vec<&Ident> {
        match self {
            Statement::Declaration(declaration) => declaration
                .declarators
                .iter()
                .map(|declarator| &declarator.name)
                .collect(),
            Statement::Function(function) => function.name.iter().collect(),
            Statement::Expression(_) | Statement::Block(_) | Statement::Return(_) => vec![],
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Statement::Expression(e) => e.id,
            Statement::Declaration(d) => d.id,
            Statement::Function(f) => f.id,
            Statement::Block(b) => b.id,
            Statement::Return(r) => r.id,
        }
    }

    pub fn position(&self) -> &Span {
        match self {
            Statement::Expression(e) => &e.position,
            Statement::Declaration(d) => &d.position,
            Statement::Function(f) => &f.position,
            Statement::Block(b) => &b.position,
            Statement::Return(r) => &r.position,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Const,
    Let,
    Var,
}

/// `const a = 1, b;`
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarators: Vec<VariableDeclarator>,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarator {
    pub name: Ident,
    pub init: Option<Expression>,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub body: Vec<Statement>,
    pub id: NodeId,
    pub position: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    pub id: NodeId,
    pub position: Span,
}
