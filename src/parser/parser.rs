//! Parser implementation for Java--
//!
//! A recursive descent parser that converts tokens into AST nodes. Every
//! expression receives a fresh [`NodeId`].

use super::{error::ParseError, lexer::{Lexer, LexicalToken, Token}};
use crate::ast::*;
use crate::consts::PARSER_MAX_DEPTH;

type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parser for Java--
pub struct Parser {
    tokens: Vec<LexicalToken>,
    current: usize,
    next_id: NodeId,
    depth: usize,
}

impl Parser {
    /// Create a new parser from source code
    pub fn new(source: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            tokens,
            current: 0,
            next_id: 0,
            depth: 0,
        })
    }

    /// Parse the source code into a program
    pub fn parse(mut self) -> ParseResult<Program> {
        let start = self.current_location();

        let mut imports = Vec::new();
        while self.check(&Token::Import) {
            imports.push(self.parse_import_decl()?);
        }

        let class = self.parse_class_decl()?;

        if !self.is_at_end() {
            let extra = self.peek();
            return Err(ParseError::unexpected_token("end of input", extra.lexeme(), extra.location()));
        }

        let span = Span::new(start, self.previous_location());
        log::debug!(
            "parsed class '{}': {} import(s), {} field(s), {} method(s), {} expression node(s)",
            class.name,
            imports.len(),
            class.fields.len(),
            class.methods.len(),
            self.next_id
        );
        Ok(Program { imports, class, span })
    }

    // Helper methods
    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn check(&self, token_type: &Token) -> bool {
        self.peek_token_type(self.current) == Some(token_type)
    }

    fn peek_token_type(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index).map(|t| t.token_type())
    }

    fn advance(&mut self) -> &LexicalToken {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn peek(&self) -> &LexicalToken {
        if self.current >= self.tokens.len() {
            &self.tokens[self.tokens.len().saturating_sub(1)]
        } else {
            &self.tokens[self.current]
        }
    }

    fn previous(&self) -> &LexicalToken {
        if self.current == 0 { &self.tokens[0] } else { &self.tokens[self.current - 1] }
    }

    fn current_location(&self) -> Location {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .map(|t| t.location())
            .unwrap_or_default()
    }

    fn previous_location(&self) -> Location {
        if self.tokens.is_empty() {
            Location::default()
        } else {
            self.previous().location()
        }
    }

    fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.previous_location())
    }

    fn consume(&mut self, token_type: &Token, expected: &str) -> ParseResult<LexicalToken> {
        if self.check(token_type) {
            return Ok(self.advance().clone());
        }
        Err(self.error_here(expected))
    }

    fn error_here(&self, expected: &str) -> ParseError {
        if self.is_at_end() {
            ParseError::unexpected_end_of_input(expected, self.previous_location())
        } else {
            let current = self.peek();
            ParseError::unexpected_token(expected, current.lexeme(), current.location())
        }
    }

    fn match_token(&mut self, token_type: &Token) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        Ok(self.consume(&Token::Identifier, "identifier")?.lexeme)
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn expr(&mut self, kind: ExprKind, start: Location) -> Expr {
        let id = self.fresh_id();
        Expr::new(id, kind, self.span_from(start))
    }

    fn enter(&mut self) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > PARSER_MAX_DEPTH {
            return Err(ParseError::invalid_syntax("nesting too deep", self.current_location()));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Import declaration parsing
    fn parse_import_decl(&mut self) -> ParseResult<ImportDecl> {
        let start = self.current_location();
        self.consume(&Token::Import, "'import'")?;

        let mut path = vec![self.parse_identifier()?];
        while self.match_token(&Token::Dot) {
            path.push(self.parse_identifier()?);
        }
        self.consume(&Token::Semicolon, "';' after import")?;

        Ok(ImportDecl { path, span: self.span_from(start) })
    }

    // Class declaration parsing
    fn parse_class_decl(&mut self) -> ParseResult<ClassDecl> {
        let start = self.current_location();
        self.consume(&Token::Class, "'class'")?;
        let name = self.parse_identifier()?;
        let extends = if self.match_token(&Token::Extends) {
            Some(self.parse_identifier()?)
        } else {
            None
        };
        self.consume(&Token::LBrace, "'{' after class header")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() {
            if self.check(&Token::Public) || self.check(&Token::Static) || self.is_method_header() {
                methods.push(self.parse_method_decl()?);
            } else {
                fields.push(self.parse_var_decl()?);
            }
        }
        self.consume(&Token::RBrace, "'}' closing class body")?;

        Ok(ClassDecl { name, extends, fields, methods, span: self.span_from(start) })
    }

    /// `type name (` ahead of the cursor
    fn is_method_header(&self) -> bool {
        let mut i = self.current;
        if !self.peek_token_type(i).map(Token::starts_type).unwrap_or(false) {
            return false;
        }
        i += 1;
        if self.peek_token_type(i) == Some(&Token::LBracket) {
            i += 2;
        }
        self.peek_token_type(i) == Some(&Token::Identifier)
            && self.peek_token_type(i + 1) == Some(&Token::LParen)
    }

    /// Single type token, without any `[]` suffix
    fn parse_base_type(&mut self) -> ParseResult<BaseType> {
        let base = match self.peek_token_type(self.current) {
            Some(Token::Int) => BaseType::Int,
            Some(Token::Boolean) => BaseType::Boolean,
            Some(Token::StringType) => BaseType::String,
            Some(Token::Void) => BaseType::Void,
            Some(Token::Identifier) => BaseType::Named(self.peek().lexeme().to_string()),
            _ => return Err(self.error_here("type")),
        };
        self.advance();
        Ok(base)
    }

    fn parse_type(&mut self) -> ParseResult<TypeRef> {
        let start = self.current_location();
        let base = self.parse_base_type()?;
        let is_array = if self.match_token(&Token::LBracket) {
            self.consume(&Token::RBracket, "']' in array type")?;
            true
        } else {
            false
        };
        Ok(TypeRef { base, is_array, span: self.span_from(start) })
    }

    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let start = self.current_location();
        let type_ref = self.parse_type()?;
        let name = self.parse_identifier()?;
        self.consume(&Token::Semicolon, "';' after declaration")?;
        Ok(VarDecl { type_ref, name, span: self.span_from(start) })
    }

    fn parse_method_decl(&mut self) -> ParseResult<MethodDecl> {
        let start = self.current_location();
        let is_public = self.match_token(&Token::Public);
        let is_static = self.match_token(&Token::Static);
        let return_type = self.parse_type()?;
        let name = self.parse_identifier()?;

        self.consume(&Token::LParen, "'(' after method name")?;
        let mut params = Vec::new();
        if !self.check(&Token::RParen) {
            loop {
                let pstart = self.current_location();
                let type_ref = self.parse_type()?;
                let pname = self.parse_identifier()?;
                params.push(VarDecl { type_ref, name: pname, span: self.span_from(pstart) });
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::RParen, "')' after parameters")?;
        self.consume(&Token::LBrace, "'{' before method body")?;

        let mut locals = Vec::new();
        let mut body = Vec::new();
        while !self.check(&Token::RBrace) && !self.is_at_end() {
            if self.is_local_decl() {
                locals.push(self.parse_var_decl()?);
            } else {
                body.push(self.parse_stmt()?);
            }
        }
        self.consume(&Token::RBrace, "'}' closing method body")?;

        Ok(MethodDecl {
            is_public,
            is_static,
            return_type,
            name,
            params,
            locals,
            body,
            span: self.span_from(start),
        })
    }

    /// `int x;`, `Foo x;`, `Foo[] x;` as opposed to a statement starting with an identifier
    fn is_local_decl(&self) -> bool {
        match self.peek_token_type(self.current) {
            Some(Token::Int) | Some(Token::Boolean) | Some(Token::StringType) | Some(Token::Void) => true,
            Some(Token::Identifier) => match self.peek_token_type(self.current + 1) {
                Some(Token::Identifier) => true,
                Some(Token::LBracket) => self.peek_token_type(self.current + 2) == Some(&Token::RBracket),
                _ => false,
            },
            _ => false,
        }
    }

    // Statement parsing
    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        self.enter()?;
        let stmt = self.parse_stmt_inner();
        self.leave();
        stmt
    }

    fn parse_stmt_inner(&mut self) -> ParseResult<Stmt> {
        let start = self.current_location();
        match self.peek_token_type(self.current) {
            Some(Token::LBrace) => {
                self.advance();
                let mut stmts = Vec::new();
                while !self.check(&Token::RBrace) && !self.is_at_end() {
                    stmts.push(self.parse_stmt()?);
                }
                self.consume(&Token::RBrace, "'}' closing block")?;
                Ok(Stmt::new(StmtKind::Block(stmts), self.span_from(start)))
            }
            Some(Token::If) => {
                self.advance();
                self.consume(&Token::LParen, "'(' after 'if'")?;
                let condition = self.parse_expr()?;
                self.consume(&Token::RParen, "')' after condition")?;
                let then_branch = Box::new(self.parse_stmt()?);
                self.consume(&Token::Else, "'else'")?;
                let else_branch = Box::new(self.parse_stmt()?);
                Ok(Stmt::new(StmtKind::If { condition, then_branch, else_branch }, self.span_from(start)))
            }
            Some(Token::While) => {
                self.advance();
                self.consume(&Token::LParen, "'(' after 'while'")?;
                let condition = self.parse_expr()?;
                self.consume(&Token::RParen, "')' after condition")?;
                let body = Box::new(self.parse_stmt()?);
                Ok(Stmt::new(StmtKind::While { condition, body }, self.span_from(start)))
            }
            Some(Token::Return) => {
                self.advance();
                let value = if self.check(&Token::Semicolon) { None } else { Some(self.parse_expr()?) };
                self.consume(&Token::Semicolon, "';' after return")?;
                Ok(Stmt::new(StmtKind::Return(value), self.span_from(start)))
            }
            _ => {
                let expr = self.parse_expr()?;
                if self.match_token(&Token::Assign) {
                    let value = self.parse_expr()?;
                    self.consume(&Token::Semicolon, "';' after assignment")?;
                    let kind = assignment_target(expr, value)?;
                    return Ok(Stmt::new(kind, self.span_from(start)));
                }
                self.consume(&Token::Semicolon, "';' after expression")?;
                Ok(Stmt::new(StmtKind::Expr(expr), self.span_from(start)))
            }
        }
    }

    // Expression parsing, lowest precedence first
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.enter()?;
        let expr = self.parse_binary(0);
        self.leave();
        expr
    }

    fn parse_binary(&mut self, level: usize) -> ParseResult<Expr> {
        if level == BINARY_LEVELS.len() {
            return self.parse_unary();
        }
        let mut folds = 0;
        let result = self.fold_binary(level, &mut folds);
        self.depth -= folds;
        result
    }

    // Each folded operator nests the left operand one level deeper, so it
    // counts against the depth limit like a parenthesis does.
    fn fold_binary(&mut self, level: usize, folds: &mut usize) -> ParseResult<Expr> {
        let start = self.current_location();
        let mut left = self.parse_binary(level + 1)?;
        'outer: loop {
            for (token, op) in BINARY_LEVELS[level] {
                if self.match_token(token) {
                    *folds += 1;
                    self.enter()?;
                    let right = self.parse_binary(level + 1)?;
                    left = self.expr(
                        ExprKind::Binary { op: *op, left: Box::new(left), right: Box::new(right) },
                        start,
                    );
                    continue 'outer;
                }
            }
            break;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let start = self.current_location();
        if self.match_token(&Token::Bang) {
            self.enter()?;
            let operand = self.parse_unary();
            self.leave();
            return Ok(self.expr(ExprKind::Not(Box::new(operand?)), start));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut folds = 0;
        let result = self.fold_postfix(&mut folds);
        self.depth -= folds;
        result
    }

    fn fold_postfix(&mut self, folds: &mut usize) -> ParseResult<Expr> {
        let start = self.current_location();
        let mut expr = self.parse_primary()?;
        loop {
            if self.check(&Token::LBracket) || self.check(&Token::Dot) {
                *folds += 1;
                self.enter()?;
            }
            if self.match_token(&Token::LBracket) {
                let index = self.parse_expr()?;
                self.consume(&Token::RBracket, "']' after index")?;
                expr = self.expr(ExprKind::Index { array: Box::new(expr), index: Box::new(index) }, start);
            } else if self.match_token(&Token::Dot) {
                let name = self.parse_identifier()?;
                if self.match_token(&Token::LParen) {
                    let args = self.parse_arguments(&Token::RParen)?;
                    expr = self.expr(
                        ExprKind::MethodCall { receiver: Box::new(expr), method: name, args },
                        start,
                    );
                } else if name == crate::consts::LENGTH {
                    expr = self.expr(ExprKind::Length(Box::new(expr)), start);
                } else {
                    return Err(ParseError::invalid_syntax(
                        &format!("field access '.{}' is not supported", name),
                        self.previous_location(),
                    ));
                }
            } else {
                return Ok(expr);
            }
        }
    }

    /// Comma-separated expressions up to `close`, which is consumed
    fn parse_arguments(&mut self, close: &Token) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(close) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(close, "closing delimiter of argument list")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let start = self.current_location();
        let token = match self.peek_token_type(self.current) {
            Some(t) => t.clone(),
            None => return Err(self.error_here("expression")),
        };
        match token {
            Token::IntegerLiteral => {
                let lexeme = self.advance().lexeme.clone();
                let value = parse_int(&lexeme, false, start)?;
                Ok(self.expr(ExprKind::IntLiteral(value), start))
            }
            Token::Minus if self.peek_token_type(self.current + 1) == Some(&Token::IntegerLiteral) => {
                self.advance();
                let lexeme = self.advance().lexeme.clone();
                let value = parse_int(&lexeme, true, start)?;
                Ok(self.expr(ExprKind::IntLiteral(value), start))
            }
            Token::True | Token::False => {
                self.advance();
                Ok(self.expr(ExprKind::BoolLiteral(token == Token::True), start))
            }
            Token::This => {
                self.advance();
                Ok(self.expr(ExprKind::This, start))
            }
            Token::Identifier => {
                let name = self.advance().lexeme.clone();
                Ok(self.expr(ExprKind::Identifier(name), start))
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.consume(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::LBracket => {
                self.advance();
                let items = self.parse_arguments(&Token::RBracket)?;
                Ok(self.expr(ExprKind::ArrayLiteral(items), start))
            }
            Token::New => {
                self.advance();
                if self.check(&Token::Identifier) && self.peek_token_type(self.current + 1) == Some(&Token::LParen) {
                    let name = self.parse_identifier()?;
                    self.consume(&Token::LParen, "'('")?;
                    self.consume(&Token::RParen, "')' (constructors take no arguments)")?;
                    return Ok(self.expr(ExprKind::NewObject(name), start));
                }
                // `new T[size]`: the brackets hold the size, not an array suffix
                let type_start = self.current_location();
                let base = self.parse_base_type()?;
                let element = TypeRef { base, is_array: false, span: self.span_from(type_start) };
                self.consume(&Token::LBracket, "'[' in array construction")?;
                let size = self.parse_expr()?;
                self.consume(&Token::RBracket, "']' in array construction")?;
                if self.check(&Token::LBracket) {
                    return Err(ParseError::invalid_syntax(
                        "multi-dimensional arrays are not supported",
                        self.current_location(),
                    ));
                }
                Ok(self.expr(ExprKind::NewArray { element, size: Box::new(size) }, start))
            }
            _ => Err(self.error_here("expression")),
        }
    }
}

// Binary operators by precedence level, loosest first
const BINARY_LEVELS: &[&[(Token, BinaryOp)]] = &[
    &[(Token::PipePipe, BinaryOp::Or)],
    &[(Token::AndAnd, BinaryOp::And)],
    &[
        (Token::Lt, BinaryOp::Lt),
        (Token::Le, BinaryOp::Le),
        (Token::Gt, BinaryOp::Gt),
        (Token::Ge, BinaryOp::Ge),
    ],
    &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
    &[(Token::Star, BinaryOp::Mul), (Token::Slash, BinaryOp::Div)],
];

fn parse_int(lexeme: &str, negative: bool, at: Location) -> ParseResult<i32> {
    let magnitude: i64 = lexeme
        .parse()
        .map_err(|_| ParseError::invalid_syntax(&format!("integer literal '{}' out of range", lexeme), at))?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value)
        .map_err(|_| ParseError::invalid_syntax(&format!("integer literal '{}' out of range", value), at))
}

/// Turn `target = value` into an assignment statement kind
fn assignment_target(target: Expr, value: Expr) -> ParseResult<StmtKind> {
    match target.kind {
        ExprKind::Identifier(name) => Ok(StmtKind::Assign { target: name, value }),
        ExprKind::Index { array, index } => match array.kind {
            ExprKind::Identifier(name) => Ok(StmtKind::ArrayAssign { target: name, index: *index, value }),
            _ => Err(ParseError::invalid_syntax("array assignment target must be a variable", array.span.start)),
        },
        _ => Err(ParseError::invalid_syntax("invalid assignment target", target.span.start)),
    }
}

/// Parse Java-- source into a program
pub fn parse(source: &str) -> crate::error::Result<Program> {
    let parser = Parser::new(source)?;
    Ok(parser.parse()?)
}
