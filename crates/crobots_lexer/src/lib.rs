pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

use crobots_ast::Diagnostic;

/// Scan the whole input, splitting `Error` tokens out into diagnostics.
/// The returned token stream always ends with `Eof` and never contains
/// error tokens; lexing never aborts.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    for tok in Lexer::new(source) {
        match tok.kind {
            TokenKind::Error(message) => diagnostics.push(Diagnostic::error(message, tok.span)),
            _ => tokens.push(tok),
        }
    }
    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_errors_from_tokens() {
        let (tokens, errors) = tokenize("x @ y");
        assert_eq!(tokens.len(), 3); // x, y, eof
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains('@'));
    }

    #[test]
    fn tokenize_always_ends_with_eof() {
        let (tokens, _) = tokenize("");
        assert_eq!(tokens.last().map(|t| t.kind.clone()), Some(TokenKind::Eof));
    }
}
