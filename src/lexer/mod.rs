use lachs::Span;

#[lachs::token]
pub enum Token {
    #[terminal("const")]
    Const,
    #[terminal("let")]
    Let,
    #[terminal("var")]
    Var,
    #[terminal("function")]
    Function,
    #[terminal("return")]
    Return,
    #[terminal("true")]
    True,
    #[terminal("false")]
    False,
    #[terminal("null")]
    Null,
    #[literal("[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Ident,
    #[literal("[0-9]+")]
    Integer,
    #[literal(r#""([^"\\]|\\.)*"|'([^'\\]|\\.)*'"#)]
    StringLiteral,
    #[terminal("=")]
    Equals,
    #[terminal("=>")]
    Arrow,
    #[terminal(",")]
    Comma,
    #[terminal(":")]
    Colon,
    #[terminal(";")]
    Semicolon,
    #[terminal("(")]
    LParen,
    #[terminal(")")]
    RParen,
    #[terminal("{")]
    LBrace,
    #[terminal("}")]
    RBrace,
    #[terminal("+")]
    Plus,
    #[terminal("-")]
    Minus,
    #[terminal("*")]
    Star,
    #[terminal("/")]
    Slash,
    #[terminal("==")]
    DoubleEquals,
    #[terminal("!=")]
    NotEquals,
    #[terminal("===")]
    StrictEquals,
    #[terminal("!==")]
    StrictNotEquals,
    #[terminal("<")]
    LessThan,
    #[terminal(">")]
    GreaterThan,
    #[terminal("<=")]
    LessEquals,
    #[terminal(">=")]
    GreaterEquals,
    #[terminal("&&")]
    LogicalAnd,
    #[terminal("||")]
    LogicalOr,
}

impl Token {
    pub fn pos(&self) -> Span {
        match self {
            Token::Const(inner) => inner.position.clone(),
            Token::Let(inner) => inner.position.clone(),
            Token::Var(inner) => inner.position.clone(),
            Token::Function(inner) => inner.position.clone(),
            Token::Return(inner) => inner.position.clone(),
            Token::True(inner) => inner.position.clone(),
            Token::False(inner) => inner.position.clone(),
            Token::Null(inner) => inner.position.clone(),
            Token::Ident(inner) => inner.position.clone(),
            Token::Integer(inner) => inner.position.clone(),
            Token::StringLiteral(inner) => inner.position.clone(),
            Token::Equals(inner) => inner.position.clone(),
            Token::Arrow(inner) => inner.position.clone(),
            Token::Comma(inner) => inner.position.clone(),
            Token::Colon(inner) => inner.position.clone(),
            Token::Semicolon(inner) => inner.position.clone(),
            Token::LParen(inner) => inner.position.clone(),
            Token::RParen(inner) => inner.position.clone(),
            Token::LBrace(inner) => inner.position.clone(),
            Token::RBrace(inner) => inner.position.clone(),
            Token::Plus(inner) => inner.position.clone(),
            Token::Minus(inner) => inner.position.clone(),
            Token::Star(inner) => inner.position.clone(),
            Token::Slash(inner) => inner.position.clone(),
            Token::DoubleEquals(inner) => inner.position.clone(),
            Token::NotEquals(inner) => inner.position.clone(),
            Token::StrictEquals(inner) => inner.position.clone(),
            Token::StrictNotEquals(inner) => inner.position.clone(),
            Token::LessThan(inner) => inner.position.clone(),
            Token::GreaterThan(inner) => inner.position.clone(),
            Token::LessEquals(inner) => inner.position.clone(),
            Token::GreaterEquals(inner) => inner.position.clone(),
            Token::LogicalAnd(inner) => inner.position.clone(),
            Token::LogicalOr(inner) => inner.position.clone(),
        }
    }

    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self {
            Token::Const(_) => "'const'".to_string(),
            Token::Let(_) => "'let'".to_string(),
            Token::Var(_) => "'var'".to_string(),
            Token::Function(_) => "'function'".to_string(),
            Token::Return(_) => "'return'".to_string(),
            Token::True(_) => "'true'".to_string(),
            Token::False(_) => "'false'".to_string(),
            Token::Null(_) => "'null'".to_string(),
            Token::Ident(inner) => format!("identifier '{}'", inner.value),
            Token::Integer(inner) => format!("integer '{}'", inner.value),
            Token::StringLiteral(inner) => format!("string {}", inner.value),
            Token::Equals(_) => "'='".to_string(),
            Token::Arrow(_) => "'=>'".to_string(),
            Token::Comma(_) => "','".to_string(),
            Token::Colon(_) => "':'".to_string(),
            Token::Semicolon(_) => "';'".to_string(),
            Token::LParen(_) => "'('".to_string(),
            Token::RParen(_) => "')'".to_string(),
            Token::LBrace(_) => "'{'".to_string(),
            Token::RBrace(_) => "'}'".to_string(),
            Token::Plus(_) => "'+'".to_string(),
            Token::Minus(_) => "'-'".to_string(),
            Token::Star(_) => "'*'".to_string(),
            Token::Slash(_) => "'/'".to_string(),
            Token::DoubleEquals(_) => "'=='".to_string(),
            Token::NotEquals(_) => "'!='".to_string(),
            Token::StrictEquals(_) => "'==='".to_string(),
            Token::StrictNotEquals(_) => "'!=='".to_string(),
            Token::LessThan(_) => "'<'".to_string(),
            Token::GreaterThan(_) => "'>'".to_string(),
            Token::LessEquals(_) => "'<='".to_string(),
            Token::GreaterEquals(_) => "'>='".to_string(),
            Token::LogicalAnd(_) => "'&&'".to_string(),
            Token::LogicalOr(_) => "'||'".to_string(),
        }
    }
}

/// Blank out `// line` and `/* block */` comments.
///
/// Comment characters become spaces and newlines inside block comments are
/// kept, so every remaining token keeps its original line and column.
/// Comment markers inside string literals are left alone.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q || c == '\n' {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                out.push(' ');
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(' ');
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                out.push_str("  ");
                let mut previous = '\0';
                for next in chars.by_ref() {
                    out.push(if next == '\n' { '\n' } else { ' ' });
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_line_comment_keeps_length() {
        let source = "a // note\nb";
        let stripped = strip_comments(source);
        assert_eq!(stripped.len(), source.len());
        assert!(!stripped.contains("note"));
        assert!(stripped.ends_with("\nb"));
    }

    #[test]
    fn test_strip_block_comment_keeps_lines() {
        let stripped = strip_comments("a /* one\ntwo */ b");
        assert_eq!(stripped.lines().count(), 2);
        assert!(!stripped.contains("one"));
        assert!(stripped.ends_with(" b"));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let source = r#"const url = "http://example.com";"#;
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(strip_comments("a / b"), "a / b");
    }
}
