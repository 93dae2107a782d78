use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};
use crobots_ast::Span;

/// Hand-written lexer over the robot language's C-like token set.
///
/// Whitespace, line comments and (nested) block comments are skipped;
/// `/** … */` doc comments survive as tokens with their inner text as
/// payload. Malformed input produces `Error` tokens, never a panic or
/// an aborted scan.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            done: false,
        }
    }

    /// Skip whitespace, line comments and block comments. Stops in
    /// front of a doc comment so `next_token` can lex it. Returns an
    /// error token if a block comment runs off the end of the input.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            self.cursor.eat_while(char::is_whitespace);

            if self.cursor.peek() == Some('/') && self.cursor.peek_next() == Some('/') {
                self.cursor.eat_while(|ch| ch != '\n');
                continue;
            }

            if self.cursor.peek() == Some('/') && self.cursor.peek_next() == Some('*') {
                // `/**` followed by anything but an immediate `/` is a
                // doc comment; `/**/` is an empty block comment.
                if self.cursor.peek_at_offset(2) == Some('*')
                    && self.cursor.peek_at_offset(3) != Some('/')
                {
                    return None;
                }
                let start = self.cursor.pos();
                self.cursor.advance(); // /
                self.cursor.advance(); // *
                if let Some(err) = self.skip_block_comment(start) {
                    return Some(err);
                }
                continue;
            }

            return None;
        }
    }

    /// Consume a block comment body, honoring nested `/* */` pairs.
    /// The opening `/*` has already been consumed.
    fn skip_block_comment(&mut self, start: usize) -> Option<Token> {
        let mut depth = 1usize;
        loop {
            match self.cursor.advance() {
                None => {
                    return Some(Token::new(
                        TokenKind::Error("unterminated block comment".into()),
                        Span::new(start, self.cursor.pos()),
                    ));
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return None;
                    }
                }
                Some('/') if self.cursor.peek() == Some('*') => {
                    self.cursor.advance();
                    depth += 1;
                }
                Some(_) => {}
            }
        }
    }

    /// Lex a `/** … */` doc comment. The `/**` prefix has already been
    /// consumed; the payload is the raw inner text.
    fn lex_doc_comment(&mut self, start: usize) -> Token {
        let body_start = self.cursor.pos();
        loop {
            match self.cursor.advance() {
                None => {
                    return Token::new(
                        TokenKind::Error("unterminated doc comment".into()),
                        Span::new(start, self.cursor.pos()),
                    );
                }
                Some('*') if self.cursor.peek() == Some('/') => {
                    let body_end = self.cursor.pos() - 1;
                    self.cursor.advance();
                    let text = self.cursor.slice(body_start, body_end).to_string();
                    return Token::new(
                        TokenKind::DocComment(text),
                        Span::new(start, self.cursor.pos()),
                    );
                }
                Some(_) => {}
            }
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.cursor.eat_while(|ch| ch.is_ascii_digit());
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        match text.parse::<i64>() {
            Ok(value) => Token::new(TokenKind::Int(value), Span::new(start, end)),
            Err(_) => Token::new(
                TokenKind::Error(format!("integer literal `{text}` out of range")),
                Span::new(start, end),
            ),
        }
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        self.cursor
            .eat_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        let end = self.cursor.pos();
        let text = self.cursor.slice(start, end);
        let span = Span::new(start, end);

        let kind = match text {
            "int" => TokenKind::KwInt,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident(text.to_string()),
        };

        Token::new(kind, span)
    }

    fn next_token(&mut self) -> Token {
        if let Some(err) = self.skip_trivia() {
            return err;
        }

        if self.cursor.is_eof() {
            let pos = self.cursor.pos();
            return Token::new(TokenKind::Eof, Span::new(pos, pos));
        }

        let start = self.cursor.pos();
        let Some(ch) = self.cursor.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let tok = |kind: TokenKind, end: usize| Token::new(kind, Span::new(start, end));

        match ch {
            '(' => tok(TokenKind::LParen, self.cursor.pos()),
            ')' => tok(TokenKind::RParen, self.cursor.pos()),
            '{' => tok(TokenKind::LBrace, self.cursor.pos()),
            '}' => tok(TokenKind::RBrace, self.cursor.pos()),
            ',' => tok(TokenKind::Comma, self.cursor.pos()),
            ';' => tok(TokenKind::Semi, self.cursor.pos()),

            '+' => {
                if self.cursor.peek() == Some('+') {
                    self.cursor.advance();
                    tok(TokenKind::PlusPlus, self.cursor.pos())
                } else if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::PlusEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Plus, self.cursor.pos())
                }
            }

            '-' => {
                if self.cursor.peek() == Some('-') {
                    self.cursor.advance();
                    tok(TokenKind::MinusMinus, self.cursor.pos())
                } else if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::MinusEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Minus, self.cursor.pos())
                }
            }

            '*' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::StarEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Star, self.cursor.pos())
                }
            }

            '/' => {
                // `/*` trivia never reaches here; only `/**` does.
                if self.cursor.peek() == Some('*') {
                    self.cursor.advance(); // *
                    self.cursor.advance(); // *
                    self.lex_doc_comment(start)
                } else if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::SlashEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Slash, self.cursor.pos())
                }
            }

            '%' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::PercentEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Percent, self.cursor.pos())
                }
            }

            '!' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::BangEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Bang, self.cursor.pos())
                }
            }

            '=' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::EqEq, self.cursor.pos())
                } else {
                    tok(TokenKind::Eq, self.cursor.pos())
                }
            }

            '<' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::LtEq, self.cursor.pos())
                } else if self.cursor.peek() == Some('<') {
                    self.cursor.advance();
                    tok(TokenKind::Shl, self.cursor.pos())
                } else {
                    tok(TokenKind::Lt, self.cursor.pos())
                }
            }

            '>' => {
                if self.cursor.peek() == Some('=') {
                    self.cursor.advance();
                    tok(TokenKind::GtEq, self.cursor.pos())
                } else if self.cursor.peek() == Some('>') {
                    self.cursor.advance();
                    tok(TokenKind::Shr, self.cursor.pos())
                } else {
                    tok(TokenKind::Gt, self.cursor.pos())
                }
            }

            '&' => {
                if self.cursor.peek() == Some('&') {
                    self.cursor.advance();
                    tok(TokenKind::AmpAmp, self.cursor.pos())
                } else {
                    tok(
                        TokenKind::Error("unexpected character '&'".to_string()),
                        self.cursor.pos(),
                    )
                }
            }

            '|' => {
                if self.cursor.peek() == Some('|') {
                    self.cursor.advance();
                    tok(TokenKind::PipePipe, self.cursor.pos())
                } else {
                    tok(
                        TokenKind::Error("unexpected character '|'".to_string()),
                        self.cursor.pos(),
                    )
                }
            }

            ch if ch.is_ascii_digit() => self.lex_number(start),

            ch if ch.is_ascii_alphabetic() || ch == '_' => self.lex_ident_or_keyword(start),

            _ => tok(
                TokenKind::Error(format!("unexpected character '{ch}'")),
                self.cursor.pos(),
            ),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let tok = self.next_token();
        if tok.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(tok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        Lexer::new(source).map(|t| t.kind).collect()
    }

    #[test]
    fn simple_int() {
        assert_eq!(lex("42"), vec![TokenKind::Int(42), TokenKind::Eof]);
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(
            lex("int interior if iffy do dot"),
            vec![
                TokenKind::KwInt,
                TokenKind::Ident("interior".into()),
                TokenKind::If,
                TokenKind::Ident("iffy".into()),
                TokenKind::Do,
                TokenKind::Ident("dot".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn compound_operators() {
        assert_eq!(
            lex("+= -= *= /= %= == != <= >= << >> && || ++ --"),
            vec![
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::PercentEq,
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::Shl,
                TokenKind::Shr,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comments_stripped() {
        assert_eq!(
            lex("a // comment\nb"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn block_comments_nest() {
        assert_eq!(
            lex("a /* outer /* inner */ still outer */ b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_is_an_error_token() {
        let toks = lex("a /* never closed");
        assert_eq!(toks[0], TokenKind::Ident("a".into()));
        assert!(matches!(toks[1], TokenKind::Error(_)));
        assert_eq!(toks[2], TokenKind::Eof);
    }

    #[test]
    fn doc_comment_payload() {
        assert_eq!(
            lex("/** drives forward */ drive"),
            vec![
                TokenKind::DocComment(" drives forward ".into()),
                TokenKind::Ident("drive".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_block_comment_is_not_a_doc_comment() {
        assert_eq!(lex("/**/ x"), vec![TokenKind::Ident("x".into()), TokenKind::Eof]);
    }

    #[test]
    fn unexpected_character_does_not_abort() {
        let toks = lex("1 @ 2");
        assert_eq!(toks[0], TokenKind::Int(1));
        assert!(matches!(toks[1], TokenKind::Error(_)));
        assert_eq!(toks[2], TokenKind::Int(2));
        assert_eq!(toks[3], TokenKind::Eof);
    }

    #[test]
    fn increments_lex_greedily() {
        assert_eq!(
            lex("++x - --y"),
            vec![
                TokenKind::PlusPlus,
                TokenKind::Ident("x".into()),
                TokenKind::Minus,
                TokenKind::MinusMinus,
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ]
        );
    }
}
