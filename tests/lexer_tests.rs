use tyscript::lexer::Token;

#[test]
fn lex_keywords() {
    let tokens = Token::lex("const let var function return").unwrap();
    assert_eq!(tokens.len(), 5);
    assert!(matches!(tokens[0], Token::Const(_)));
    assert!(matches!(tokens[1], Token::Let(_)));
    assert!(matches!(tokens[2], Token::Var(_)));
    assert!(matches!(tokens[3], Token::Function(_)));
    assert!(matches!(tokens[4], Token::Return(_)));
}

#[test]
fn lex_literal_keywords() {
    let tokens = Token::lex("true false null").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[0], Token::True(_)));
    assert!(matches!(tokens[1], Token::False(_)));
    assert!(matches!(tokens[2], Token::Null(_)));
}

#[test]
fn lex_identifiers() {
    let tokens = Token::lex("foo _bar $baz constant").unwrap();
    assert_eq!(tokens.len(), 4);
    assert!(matches!(&tokens[0], Token::Ident(i) if i.value == "foo"));
    assert!(matches!(&tokens[1], Token::Ident(i) if i.value == "_bar"));
    assert!(matches!(&tokens[2], Token::Ident(i) if i.value == "$baz"));
    assert!(matches!(&tokens[3], Token::Ident(i) if i.value == "constant"));
}

#[test]
fn lex_integers() {
    let tokens = Token::lex("42 0 123").unwrap();
    assert_eq!(tokens.len(), 3);
    assert!(matches!(&tokens[0], Token::Integer(i) if i.value == "42"));
    assert!(matches!(&tokens[1], Token::Integer(i) if i.value == "0"));
    assert!(matches!(&tokens[2], Token::Integer(i) if i.value == "123"));
}

#[test]
fn lex_string_literals() {
    let tokens = Token::lex(r#""hello" 'world'"#).unwrap();
    assert_eq!(tokens.len(), 2);
    assert!(matches!(&tokens[0], Token::StringLiteral(s) if s.value == "\"hello\""));
    assert!(matches!(&tokens[1], Token::StringLiteral(s) if s.value == "'world'"));
}

#[test]
fn lex_punctuation() {
    let tokens = Token::lex("= => , : ; ( ) { }").unwrap();
    assert_eq!(tokens.len(), 9);
    assert!(matches!(tokens[0], Token::Equals(_)));
    assert!(matches!(tokens[1], Token::Arrow(_)));
    assert!(matches!(tokens[2], Token::Comma(_)));
    assert!(matches!(tokens[3], Token::Colon(_)));
    assert!(matches!(tokens[4], Token::Semicolon(_)));
    assert!(matches!(tokens[5], Token::LParen(_)));
    assert!(matches!(tokens[6], Token::RParen(_)));
    assert!(matches!(tokens[7], Token::LBrace(_)));
    assert!(matches!(tokens[8], Token::RBrace(_)));
}

#[test]
fn lex_operators_prefer_longest_match() {
    let tokens = Token::lex("== === != !== <= >= < > && ||").unwrap();
    assert_eq!(tokens.len(), 10);
    assert!(matches!(tokens[0], Token::DoubleEquals(_)));
    assert!(matches!(tokens[1], Token::StrictEquals(_)));
    assert!(matches!(tokens[2], Token::NotEquals(_)));
    assert!(matches!(tokens[3], Token::StrictNotEquals(_)));
    assert!(matches!(tokens[4], Token::LessEquals(_)));
    assert!(matches!(tokens[5], Token::GreaterEquals(_)));
    assert!(matches!(tokens[6], Token::LessThan(_)));
    assert!(matches!(tokens[7], Token::GreaterThan(_)));
    assert!(matches!(tokens[8], Token::LogicalAnd(_)));
    assert!(matches!(tokens[9], Token::LogicalOr(_)));
}

#[test]
fn lex_arrow_function() {
    let tokens = Token::lex("const f = x => x + 1;").unwrap();
    assert_eq!(tokens.len(), 9);
    assert!(matches!(tokens[0], Token::Const(_)));
    assert!(matches!(&tokens[1], Token::Ident(i) if i.value == "f"));
    assert!(matches!(tokens[2], Token::Equals(_)));
    assert!(matches!(&tokens[3], Token::Ident(i) if i.value == "x"));
    assert!(matches!(tokens[4], Token::Arrow(_)));
    assert!(matches!(tokens[6], Token::Plus(_)));
    assert!(matches!(&tokens[7], Token::Integer(i) if i.value == "1"));
    assert!(matches!(tokens[8], Token::Semicolon(_)));
}

#[test]
fn describe_names_the_token() {
    let tokens = Token::lex("answer 42 =>").unwrap();
    assert_eq!(tokens[0].describe(), "identifier 'answer'");
    assert_eq!(tokens[1].describe(), "integer '42'");
    assert_eq!(tokens[2].describe(), "'=>'");
}
