use crate::cst::{CstDeclarator, CstProgram, CstStmt, CstStmtKind};
use crobots_ast::{Diagnostic, Span, Spanned};
use crobots_lexer::{tokenize, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let (tokens, lex_errors) = tokenize(source);
        Self {
            tokens,
            pos: 0,
            diagnostics: lex_errors,
        }
    }

    // ── Token helpers ────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn peek_span(&self) -> Span {
        self.tokens.get(self.pos).map(|t| t.span).unwrap_or_else(|| {
            self.tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end))
                .unwrap_or(Span::dummy())
        })
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .unwrap_or_else(|| Token::new(TokenKind::Eof, Span::dummy()));
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token, ()> {
        if self.at(expected) {
            Ok(self.advance())
        } else {
            self.error(format!(
                "expected {}, found {}",
                expected.describe(),
                self.peek().describe()
            ));
            Err(())
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<Spanned<String>, ()> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let tok = self.advance();
                Ok(Spanned::new(name, tok.span))
            }
            other => {
                self.error(format!("expected identifier, found {}", other.describe()));
                Err(())
            }
        }
    }

    pub(crate) fn start_span(&self) -> usize {
        self.peek_span().start
    }

    pub(crate) fn end_span(&self, start: usize) -> Span {
        let end = if self.pos > 0 {
            self.tokens[self.pos - 1].span.end
        } else {
            start
        };
        Span::new(start, end)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        let span = self.peek_span();
        self.diagnostics.push(Diagnostic::error(message, span));
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    // ── Program parsing ──────────────────────────────────────────

    /// Parse a whole compilation unit. Local failures resynchronize at
    /// the next top-level declaration so one error never loses the rest
    /// of the file.
    pub fn parse_program(&mut self) -> CstProgram {
        let program_start = self.start_span();
        let mut items = Vec::new();
        while !matches!(self.peek(), TokenKind::Eof) {
            match self.parse_top_level() {
                Ok(item) => items.push(item),
                Err(()) => self.recover_to_top_level(),
            }
        }
        CstProgram {
            span: self.end_span(program_start),
            items,
        }
    }

    fn parse_top_level(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();

        let doc = match self.peek() {
            TokenKind::DocComment(text) => {
                let text = text.trim().to_string();
                self.advance();
                Some(text)
            }
            _ => None,
        };

        match self.peek() {
            TokenKind::KwInt => self.parse_var_decl(),
            TokenKind::Ident(_) if matches!(self.peek_at(1), TokenKind::LParen) => {
                self.parse_function_decl(start, doc)
            }
            other => {
                self.error(format!(
                    "expected a function or `int` declaration, found {}",
                    other.describe()
                ));
                Err(())
            }
        }
    }

    fn parse_function_decl(&mut self, start: usize, doc: Option<String>) -> Result<CstStmt, ()> {
        let name = self.expect_ident()?;
        self.expect(&TokenKind::LParen)?;

        let mut params = Vec::new();
        if !matches!(self.peek(), TokenKind::RParen) {
            params.push(self.expect_ident()?);
            while matches!(self.peek(), TokenKind::Comma) {
                self.advance();
                params.push(self.expect_ident()?);
            }
        }
        self.expect(&TokenKind::RParen)?;

        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace | TokenKind::Eof) {
            match self.parse_stmt() {
                Ok(stmt) => body.push(stmt),
                Err(()) => self.recover_to_stmt(),
            }
        }
        self.expect(&TokenKind::RBrace)?;

        Ok(Spanned::new(
            CstStmtKind::FunctionDecl {
                doc,
                name,
                params,
                body,
            },
            self.end_span(start),
        ))
    }

    // ── Statements ───────────────────────────────────────────────

    pub(crate) fn parse_stmt(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        match self.peek() {
            TokenKind::Semi => {
                self.advance();
                Ok(Spanned::new(CstStmtKind::Empty, self.end_span(start)))
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::KwInt => self.parse_var_decl(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semi)?;
                Ok(Spanned::new(CstStmtKind::Expr(expr), self.end_span(start)))
            }
        }
    }

    fn parse_block(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !matches!(self.peek(), TokenKind::RBrace | TokenKind::Eof) {
            match self.parse_stmt() {
                Ok(stmt) => body.push(stmt),
                Err(()) => self.recover_to_stmt(),
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Spanned::new(CstStmtKind::Block(body), self.end_span(start)))
    }

    fn parse_if(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::If)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if matches!(self.peek(), TokenKind::Else) {
            self.advance();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Spanned::new(
            CstStmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            self.end_span(start),
        ))
    }

    fn parse_while(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = Box::new(self.parse_stmt()?);
        Ok(Spanned::new(
            CstStmtKind::While { cond, body },
            self.end_span(start),
        ))
    }

    fn parse_do_while(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::Do)?;
        let body = Box::new(self.parse_stmt()?);
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semi)?;
        Ok(Spanned::new(
            CstStmtKind::DoWhile { body, cond },
            self.end_span(start),
        ))
    }

    fn parse_return(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::Return)?;
        let expr = if matches!(self.peek(), TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(&TokenKind::Semi)?;
        Ok(Spanned::new(
            CstStmtKind::Return(expr),
            self.end_span(start),
        ))
    }

    fn parse_var_decl(&mut self) -> Result<CstStmt, ()> {
        let start = self.start_span();
        self.expect(&TokenKind::KwInt)?;
        let mut decls = vec![self.parse_declarator()?];
        while matches!(self.peek(), TokenKind::Comma) {
            self.advance();
            decls.push(self.parse_declarator()?);
        }
        self.expect(&TokenKind::Semi)?;
        Ok(Spanned::new(
            CstStmtKind::VarDecl(decls),
            self.end_span(start),
        ))
    }

    fn parse_declarator(&mut self) -> Result<CstDeclarator, ()> {
        let name = self.expect_ident()?;
        let init = if matches!(self.peek(), TokenKind::Eq) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(CstDeclarator { name, init })
    }

    // ── Recovery ─────────────────────────────────────────────────

    /// Skip to the next statement boundary: past a `;`, or in front of
    /// a `}` or a statement-starting token. Brace depth is tracked so
    /// a `}` inside a nested block is not mistaken for the boundary.
    fn recover_to_stmt(&mut self) {
        let mut depth: usize = 0;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace if depth > 0 => {
                    depth -= 1;
                    self.advance();
                }
                TokenKind::RBrace => return,
                kind if depth == 0 && kind.starts_statement() => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next plausible top-level declaration: `int`, a doc
    /// comment, or `name(`.
    fn recover_to_top_level(&mut self) {
        let mut depth: usize = 0;
        loop {
            match self.peek() {
                TokenKind::Eof => return,
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::KwInt | TokenKind::DocComment(_) if depth == 0 => return,
                TokenKind::Ident(_)
                    if depth == 0 && matches!(self.peek_at(1), TokenKind::LParen) =>
                {
                    return
                }
                _ => {
                    self.advance();
                }
            }
        }
    }
}
