use jmmc::parser::{Lexer, Token};

#[test]
fn lexer_keywords() {
    let source = "import class extends public static void int boolean String return if else while new this true false";
    let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

    assert_eq!(tokens.len(), 17);
    assert!(tokens.iter().all(|t| t.token_type().is_keyword()));
    assert!(tokens[8].is(&Token::StringType));
}

#[test]
fn lexer_skips_comments_and_tracks_lines() {
    let source = "// header\nint /* inline */ x;\n/* multi\nline */ y";
    let tokens = Lexer::new(source).tokenize().expect("Failed to tokenize");

    let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme()).collect();
    assert_eq!(lexemes, vec!["int", "x", ";", "y"]);
    assert_eq!(tokens[0].location().line, 2);
    assert_eq!(tokens[1].location().column, 18);
    assert_eq!(tokens[3].location().line, 4);
}

#[test]
fn lexer_rejects_unknown_characters() {
    assert!(Lexer::new("int x = 1 % 2;").tokenize().is_err());
    assert!(Lexer::new("\"text\"").tokenize().is_err());
}
