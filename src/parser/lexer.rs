use logos::Logos;
use crate::ast::Location;
use super::error::ParseError;

/// Token types for Java--
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    // Keywords
    #[token("import")]
    Import,
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("public")]
    Public,
    #[token("static")]
    Static,
    #[token("void")]
    Void,
    #[token("int")]
    Int,
    #[token("boolean")]
    Boolean,
    #[token("String")]
    StringType,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("new")]
    New,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Operators
    #[token("&&")]
    AndAnd,
    #[token("||")]
    PipePipe,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("=")]
    Assign,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Literals
    #[regex(r"[0-9]+")]
    IntegerLiteral,

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // Comments and whitespace
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^/*][^*]*\*+)*/", priority = 2)]
    BlockComment,
    #[regex(r"[ \t\n\r]+", priority = 2)]
    Whitespace,
}

impl Token {
    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(self,
            Token::Import | Token::Class | Token::Extends |
            Token::Public | Token::Static | Token::Void |
            Token::Int | Token::Boolean | Token::StringType |
            Token::Return | Token::If | Token::Else |
            Token::While | Token::New | Token::This |
            Token::True | Token::False
        )
    }

    /// Tokens that can start a type in a declaration
    pub fn starts_type(&self) -> bool {
        matches!(self,
            Token::Int | Token::Boolean | Token::StringType |
            Token::Void | Token::Identifier
        )
    }

    fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::LineComment | Token::BlockComment)
    }
}

/// Significant token with its source text and start position
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self { token, lexeme, location }
    }

    pub fn token_type(&self) -> &Token {
        &self.token
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is(&self, token_type: &Token) -> bool {
        &self.token == token_type
    }
}

/// Lexer for Java--
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
    current_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
            current_offset: 0,
        }
    }

    /// Get the next token, trivia included
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, ParseError>> {
        let token = self.lexer.next()?;
        let lexeme = self.lexer.slice().to_string();
        let location = Location::new(self.current_line, self.current_column, self.current_offset);
        self.update_position(&lexeme);

        match token {
            Ok(token) => Some(Ok(LexicalToken::new(token, lexeme, location))),
            Err(_) => Some(Err(ParseError::lexical_error(
                &format!("unexpected character(s) '{}'", lexeme),
                location,
            ))),
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        for ch in lexeme.chars() {
            match ch {
                '\n' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                '\r' => {}
                _ => {
                    self.current_column += 1;
                }
            }
            self.current_offset += ch.len_utf8();
        }
    }

    /// Get all significant tokens from the source
    pub fn tokenize(mut self) -> Result<Vec<LexicalToken>, ParseError> {
        let mut tokens = Vec::new();

        while let Some(result) = self.next_token() {
            let token = result?;
            if !token.token.is_trivia() {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }
}
