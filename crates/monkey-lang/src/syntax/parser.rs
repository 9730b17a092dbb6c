//! Pratt parser. Each token kind maps to at most one prefix rule and one
//! infix rule; infix rules carry a binding power from `Precedence`.
//!
//! Parsing never aborts the whole input: a failed statement is recorded as a
//! `ParseError`, the parser skips to the next `;` and carries on.

use crate::error::{ParseError, ParseErrorKind};
use crate::syntax::ast::*;
use crate::syntax::lexer::Lexer;
use crate::syntax::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    AndOr,      // && ||
    Equals,     // == !=
    Comparison, // < >
    Sum,        // + -
    Product,    // * /
    Prefix,     // -x !x
    Call,       // f(x)
    Index,      // a[i]
}

type PrefixFn = fn(&mut Parser, Token) -> Result<Expression, ParseError>;
type InfixFn = fn(&mut Parser, Expression, Token) -> Result<Expression, ParseError>;

fn prefix_rule(kind: TokenKind) -> Option<PrefixFn> {
    let rule: PrefixFn = match kind {
        TokenKind::Ident              => Parser::parse_identifier,
        TokenKind::Int                => Parser::parse_integer,
        TokenKind::Float              => Parser::parse_float,
        TokenKind::String             => Parser::parse_string,
        TokenKind::True
        | TokenKind::False            => Parser::parse_boolean,
        TokenKind::Bang
        | TokenKind::Minus            => Parser::parse_prefix,
        TokenKind::LParen             => Parser::parse_grouped,
        TokenKind::LBracket           => Parser::parse_array,
        TokenKind::If                 => Parser::parse_if,
        TokenKind::While              => Parser::parse_while,
        TokenKind::Function           => Parser::parse_function,
        _ => return None,
    };
    Some(rule)
}

fn infix_rule(kind: TokenKind) -> Option<InfixFn> {
    let rule: InfixFn = match kind {
        TokenKind::LParen   => Parser::parse_call,
        TokenKind::LBracket => Parser::parse_index,
        k if infix_op(k).is_some() => Parser::parse_infix,
        _ => return None,
    };
    Some(rule)
}

/// Binding power of `kind` in infix position; `Lowest` for everything else.
fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::And | TokenKind::Or         => Precedence::AndOr,
        TokenKind::Eq | TokenKind::NotEq       => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt          => Precedence::Comparison,
        TokenKind::Plus | TokenKind::Minus     => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen                      => Precedence::Call,
        TokenKind::LBracket                    => Precedence::Index,
        _                                      => Precedence::Lowest,
    }
}

fn infix_op(kind: TokenKind) -> Option<InfixOp> {
    Some(match kind {
        TokenKind::Plus     => InfixOp::Plus,
        TokenKind::Minus    => InfixOp::Minus,
        TokenKind::Asterisk => InfixOp::Asterisk,
        TokenKind::Slash    => InfixOp::Slash,
        TokenKind::Lt       => InfixOp::Lt,
        TokenKind::Gt       => InfixOp::Gt,
        TokenKind::Eq       => InfixOp::Eq,
        TokenKind::NotEq    => InfixOp::NotEq,
        TokenKind::And      => InfixOp::And,
        TokenKind::Or       => InfixOp::Or,
        _ => return None,
    })
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    /// `tokens` must end with `Eof`, as produced by `Lexer::tokenize`.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    pub fn from_source(source: &str) -> Self {
        Self::new(Lexer::new(source).tokenize())
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// Parse every statement in the input. Always returns a tree; check
    /// `errors()` before trusting it.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn parse_program(&mut self) -> Code {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if self.matches(TokenKind::Semicolon) { continue; }

            match self.parse_statement() {
                Ok(s) => statements.push(s),
                Err(e) => {
                    tracing::debug!(error = %e, "statement abandoned");
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        tracing::debug!(statements = statements.len(), errors = self.errors.len(), "parsed");
        Code { statements }
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let stmt = match self.peek_kind() {
            TokenKind::Let    => self.parse_let()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::LBrace => Statement::Block(self.parse_block()?),
            _ => Statement::Expression { expr: self.parse_expression(Precedence::Lowest)? },
        };
        self.matches(TokenKind::Semicolon);
        Ok(stmt)
    }

    fn parse_let(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Let)?;
        let name = self.expect(TokenKind::Ident)?.literal;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Statement::Let { name, value })
    }

    fn parse_return(&mut self) -> Result<Statement, ParseError> {
        self.expect(TokenKind::Return)?;
        let value = self.parse_expression(Precedence::Lowest)?;
        Ok(Statement::Return { value })
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            if self.matches(TokenKind::Semicolon) { continue; }
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(Block { statements })
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    pub fn parse_expression(&mut self, min: Precedence) -> Result<Expression, ParseError> {
        let Some(prefix) = prefix_rule(self.peek_kind()) else {
            return Err(self.no_prefix());
        };
        let tok = self.advance();
        let mut left = prefix(self, tok)?;

        while !self.check(TokenKind::Semicolon) && min < precedence_of(self.peek_kind()) {
            let Some(infix) = infix_rule(self.peek_kind()) else { break };
            let tok = self.advance();
            left = infix(self, left, tok)?;
        }

        Ok(left)
    }

    fn parse_expression_list(&mut self, close: TokenKind) -> Result<Vec<Expression>, ParseError> {
        let mut items = Vec::new();
        if self.matches(close) {
            return Ok(items);
        }
        items.push(self.parse_expression(Precedence::Lowest)?);
        while self.matches(TokenKind::Comma) {
            items.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect(close)?;
        Ok(items)
    }

    // ── prefix rules ─────────────────────────────────────────────────────────

    fn parse_identifier(&mut self, tok: Token) -> Result<Expression, ParseError> {
        Ok(Expression::Identifier(tok.literal))
    }

    fn parse_integer(&mut self, tok: Token) -> Result<Expression, ParseError> {
        tok.literal.parse()
            .map(Expression::IntegerLiteral)
            .map_err(|_| error_at(&tok, ParseErrorKind::InvalidInteger(tok.literal.clone())))
    }

    fn parse_float(&mut self, tok: Token) -> Result<Expression, ParseError> {
        match tok.literal.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Expression::FloatLiteral(v)),
            _ => Err(error_at(&tok, ParseErrorKind::InvalidFloat(tok.literal.clone()))),
        }
    }

    fn parse_string(&mut self, tok: Token) -> Result<Expression, ParseError> {
        Ok(Expression::StringLiteral(tok.literal))
    }

    fn parse_boolean(&mut self, tok: Token) -> Result<Expression, ParseError> {
        Ok(Expression::BooleanLiteral(tok.kind == TokenKind::True))
    }

    fn parse_prefix(&mut self, tok: Token) -> Result<Expression, ParseError> {
        let op = if tok.kind == TokenKind::Bang { PrefixOp::Bang } else { PrefixOp::Minus };
        let operand = self.parse_expression(Precedence::Prefix)?;
        Ok(Expression::Prefix { op, operand: Box::new(operand) })
    }

    fn parse_grouped(&mut self, _tok: Token) -> Result<Expression, ParseError> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_array(&mut self, _tok: Token) -> Result<Expression, ParseError> {
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Ok(Expression::ArrayLiteral(elements))
    }

    /// `if (cond) { ... } else { ... }`
    fn parse_if(&mut self, _tok: Token) -> Result<Expression, ParseError> {
        let condition = self.parse_condition()?;
        let consequence = self.parse_block()?;
        let alternative = if self.matches(TokenKind::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Expression::If { condition: Box::new(condition), consequence, alternative })
    }

    /// `while (cond) { ... }`
    fn parse_while(&mut self, _tok: Token) -> Result<Expression, ParseError> {
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        Ok(Expression::While { condition: Box::new(condition), body })
    }

    fn parse_condition(&mut self) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    /// `fn(a, b) { ... }`
    fn parse_function(&mut self, _tok: Token) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.matches(TokenKind::RParen) {
            params.push(self.expect(TokenKind::Ident)?.literal);
            while self.matches(TokenKind::Comma) {
                params.push(self.expect(TokenKind::Ident)?.literal);
            }
            self.expect(TokenKind::RParen)?;
        }
        let body = self.parse_block()?;
        Ok(Expression::FunctionLiteral { params, body })
    }

    // ── infix rules ──────────────────────────────────────────────────────────

    fn parse_infix(&mut self, left: Expression, tok: Token) -> Result<Expression, ParseError> {
        let Some(op) = infix_op(tok.kind) else {
            return Err(error_at(&tok, ParseErrorKind::NoPrefixRule(tok.kind)));
        };
        let right = self.parse_expression(precedence_of(tok.kind))?;
        Ok(Expression::Infix { op, left: Box::new(left), right: Box::new(right) })
    }

    fn parse_call(&mut self, callee: Expression, _tok: Token) -> Result<Expression, ParseError> {
        let args = self.parse_expression_list(TokenKind::RParen)?;
        Ok(Expression::Call { callee: Box::new(callee), args })
    }

    fn parse_index(&mut self, collection: Expression, _tok: Token) -> Result<Expression, ParseError> {
        let index = self.parse_expression(Precedence::Lowest)?;
        self.expect(TokenKind::RBracket)?;
        Ok(Expression::Index { collection: Box::new(collection), index: Box::new(index) })
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek().kind;
            Err(error_at(self.peek(), ParseErrorKind::UnexpectedToken { expected: kind, found }))
        }
    }

    fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn no_prefix(&self) -> ParseError {
        let tok = self.peek();
        let kind = match tok.kind {
            TokenKind::Illegal => ParseErrorKind::IllegalToken(tok.literal.clone()),
            other => ParseErrorKind::NoPrefixRule(other),
        };
        error_at(tok, kind)
    }

    /// Skip to just past the next `;`, or to end of input.
    fn synchronize(&mut self) {
        while !self.check(TokenKind::Semicolon) && !self.is_at_end() {
            self.advance();
        }
        self.matches(TokenKind::Semicolon);
    }
}

fn error_at(tok: &Token, kind: ParseErrorKind) -> ParseError {
    ParseError::new(kind, tok.line, tok.column)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(src: &str) -> Code {
        let mut parser = Parser::from_source(src);
        let code = parser.parse_program();
        assert!(parser.errors().is_empty(), "unexpected parse errors: {:#?}", parser.errors());
        code
    }

    fn parse_expr_src(src: &str) -> Expression {
        let code = parse(src);
        assert_eq!(code.statements.len(), 1, "expected a single statement");
        match code.statements.into_iter().next() {
            Some(Statement::Expression { expr }) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn render(src: &str) -> String {
        parse(src).to_string()
    }

    fn parse_err(src: &str) -> Vec<ParseError> {
        let mut parser = Parser::from_source(src);
        parser.parse_program();
        assert!(!parser.errors().is_empty(), "expected parse errors for {src:?}");
        parser.into_errors()
    }

    // ── statements ───────────────────────────────────────────────────────────

    #[test]
    fn let_statements() {
        let code = parse("let x = 5;\nlet y = true;\nlet foobar = y;");
        assert_eq!(
            code.statements,
            vec![
                Statement::Let { name: "x".into(), value: Expression::IntegerLiteral(5) },
                Statement::Let { name: "y".into(), value: Expression::BooleanLiteral(true) },
                Statement::Let { name: "foobar".into(), value: Expression::Identifier("y".into()) },
            ]
        );
    }

    #[test]
    fn return_statements() {
        let code = parse("return 5; return x; return add(1, 2)");
        assert_eq!(code.statements.len(), 3);
        assert!(code.statements.iter().all(|s| matches!(s, Statement::Return { .. })));
    }

    #[test]
    fn semicolons_are_optional() {
        assert_eq!(parse("let a = 1 let b = 2 a").statements.len(), 3);
    }

    #[test]
    fn stray_semicolons_are_skipped() {
        assert_eq!(parse(";; let a = 1;;").statements.len(), 1);
    }

    #[test]
    fn block_statement() {
        let code = parse("{ let a = 1; a }");
        match &code.statements[0] {
            Statement::Block(block) => assert_eq!(block.statements.len(), 2),
            other => panic!("expected block statement, got {other:?}"),
        }
    }

    // ── literals ─────────────────────────────────────────────────────────────

    #[test]
    fn literal_expressions() {
        assert_eq!(parse_expr_src("foobar"), Expression::Identifier("foobar".into()));
        assert_eq!(parse_expr_src("5"), Expression::IntegerLiteral(5));
        assert_eq!(parse_expr_src("2.5"), Expression::FloatLiteral(2.5));
        assert_eq!(parse_expr_src("false"), Expression::BooleanLiteral(false));
        assert_eq!(parse_expr_src(r#""hello world""#), Expression::StringLiteral("hello world".into()));
    }

    #[test]
    fn array_literal() {
        assert_eq!(render("[1, 2 * 2, 3 + 3]"), "[1,(2 * 2),(3 + 3)]");
        assert_eq!(parse_expr_src("[]"), Expression::ArrayLiteral(vec![]));
    }

    // ── operators ────────────────────────────────────────────────────────────

    #[test]
    fn prefix_expressions() {
        assert_eq!(render("!5"), "(!5)");
        assert_eq!(render("-15"), "(-15)");
        assert_eq!(render("!true"), "(!true)");
        assert_eq!(render("---42"), "(-(-(-42)))");
        assert_eq!(render("-!!int"), "(-(!(!int)))");
    }

    #[test]
    fn infix_expressions() {
        for op in ["+", "-", "*", "/", "<", ">", "==", "!=", "&&", "||"] {
            assert_eq!(render(&format!("5 {op} 5")), format!("(5 {op} 5)"));
        }
    }

    #[test]
    fn operator_precedence() {
        let cases = [
            ("-1 + 2 * 3", "((-1) + (2 * 3))"),
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("3 + 4; -5 * 5", "(3 + 4);\n((-5) * 5)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("true && false || true", "((true && false) || true)"),
            ("a == b && c != d", "((a == b) && (c != d))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("(5 + 5) * 2", "((5 + 5) * 2)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a,b,1,(2 * 3),(4 + 5),add(6,(7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
            ("a * b[2]", "(a * (b[2]))"),
            ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1,2,3,4][(b * c)])) * d)"),
            ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])),(b[1]),(2 * ([1,2][1])))"),
        ];
        for (src, expected) in cases {
            assert_eq!(render(src), expected, "source: {src}");
        }
    }

    // ── control flow ─────────────────────────────────────────────────────────

    #[test]
    fn if_expression() {
        assert_eq!(render("if (x < y) { x }"), "if(x < y) {\nx\n}");
    }

    #[test]
    fn if_else_expression() {
        assert_eq!(render("if (x < y) { x } else { y }"), "if(x < y) {\nx\n}else{\ny\n}");
        match parse_expr_src("if (x) { 1 } else { 2 }") {
            Expression::If { alternative: Some(alt), .. } => assert_eq!(alt.statements.len(), 1),
            other => panic!("expected if/else, got {other:?}"),
        }
    }

    #[test]
    fn while_expression() {
        assert_eq!(render("while (i < 3) { i; x }"), "while(i < 3) {\ni;\nx\n}");
    }

    #[test]
    fn bare_if_condition_is_parenthesized_when_rendered() {
        assert_eq!(render("if (flag) { 1 }"), "if(flag) {\n1\n}");
    }

    // ── functions ────────────────────────────────────────────────────────────

    #[test]
    fn function_literal() {
        assert_eq!(render("fn(x, y) { x + y; }"), "fn(x,y){\n(x + y)\n}");
        match parse_expr_src("fn(x, y) { x + y; }") {
            Expression::FunctionLiteral { params, body } => {
                assert_eq!(params, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(body.statements.len(), 1);
            }
            other => panic!("expected function literal, got {other:?}"),
        }
    }

    #[test]
    fn function_parameters() {
        assert_eq!(render("fn() {};"), "fn(){\n}");
        assert_eq!(render("fn(x) {};"), "fn(x){\n}");
        assert_eq!(render("fn(x, y, z) {};"), "fn(x,y,z){\n}");
    }

    #[test]
    fn call_expression() {
        assert_eq!(render("add(1, 2 * 3, 4 + 5);"), "add(1,(2 * 3),(4 + 5))");
        assert_eq!(render("fn(x) { x }(5)"), "fn(x){\nx\n}(5)");
    }

    // ── errors ───────────────────────────────────────────────────────────────

    #[test]
    fn missing_assign_in_let() {
        let errs = parse_err("let x 5;");
        assert_eq!(
            errs[0].kind,
            ParseErrorKind::UnexpectedToken { expected: TokenKind::Assign, found: TokenKind::Int }
        );
        assert_eq!(errs[0].to_string(), "1:7: expected next token to be =, got INT instead");
    }

    #[test]
    fn errors_accumulate_across_statements() {
        let errs = parse_err("let x 5; let = 10; let 838383;");
        assert_eq!(errs.len(), 3);
        assert_eq!(
            errs[1].kind,
            ParseErrorKind::UnexpectedToken { expected: TokenKind::Ident, found: TokenKind::Assign }
        );
    }

    #[test]
    fn parsing_resumes_after_error() {
        let mut parser = Parser::from_source("let x 5; let y = 2;");
        let code = parser.parse_program();
        assert_eq!(parser.errors().len(), 1);
        assert_eq!(code.to_string(), "let y = 2");
    }

    #[test]
    fn missing_prefix_rule() {
        let errs = parse_err("let x = ;");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ParseErrorKind::NoPrefixRule(TokenKind::Semicolon));
        assert_eq!(errs[0].to_string(), "1:9: no prefix parse function for ; found");
    }

    #[test]
    fn illegal_token_is_reported() {
        let errs = parse_err("1 + @");
        assert_eq!(errs[0].kind, ParseErrorKind::IllegalToken("@".into()));
    }

    #[test]
    fn unterminated_string_is_reported() {
        let errs = parse_err(r#"let s = "abc"#);
        assert_eq!(errs[0].kind, ParseErrorKind::IllegalToken("\"abc".into()));
    }

    #[test]
    fn integer_overflow_literal() {
        let errs = parse_err("99999999999999999999");
        assert_eq!(errs[0].kind, ParseErrorKind::InvalidInteger("99999999999999999999".into()));
    }

    #[test]
    fn float_out_of_range() {
        let literal = format!("{}.5", "9".repeat(400));
        let errs = parse_err(&literal);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].kind, ParseErrorKind::InvalidFloat(literal));
    }

    #[test]
    fn unclosed_block_is_error() {
        let errs = parse_err("fn(x) { x");
        assert_eq!(
            errs[0].kind,
            ParseErrorKind::UnexpectedToken { expected: TokenKind::RBrace, found: TokenKind::Eof }
        );
    }

    #[test]
    fn stray_closing_brace_does_not_hang() {
        let errs = parse_err("} } )");
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn precedence_ordering() {
        assert!(Precedence::Lowest < Precedence::AndOr);
        assert!(Precedence::AndOr < Precedence::Equals);
        assert!(Precedence::Product < Precedence::Prefix);
        assert!(Precedence::Call < Precedence::Index);
    }
}
