use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crobots_lexer::token::TokenKind;
use crobots_lexer::Lexer;

/// Session command names that get special highlighting.
const SESSION_COMMANDS: &[&str] = &["help", "seed"];

/// Syntax highlighter for the REPL.
///
/// Tokenizes the input with the robot-language lexer and colors by
/// token kind. The first word is checked against session command names
/// and highlighted specially.
pub struct CrobotsHighlighter;

impl Highlighter for CrobotsHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.is_empty() {
            return styled;
        }

        let first_word = line.split_whitespace().next().unwrap_or("");
        let is_session_cmd = SESSION_COMMANDS.contains(&first_word);

        let mut last_end = 0;
        let mut is_first_token = true;

        for token in Lexer::new(line) {
            if matches!(token.kind, TokenKind::Eof) {
                break;
            }

            // Gaps between tokens are whitespace or comments.
            if token.span.start > last_end {
                push_gap(&mut styled, &line[last_end..token.span.start]);
            }

            let text = &line[token.span.start..token.span.end];
            let style = token_style(&token.kind, is_session_cmd && is_first_token);
            is_first_token = false;

            styled.push((style, text.to_string()));
            last_end = token.span.end;
        }

        if last_end < line.len() {
            push_gap(&mut styled, &line[last_end..]);
        }

        styled
    }
}

/// Whitespace stays plain; anything from a comment opener onward is
/// dimmed.
fn push_gap(styled: &mut StyledText, gap: &str) {
    let comment_start = match (gap.find("//"), gap.find("/*")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    match comment_start {
        Some(at) => {
            if at > 0 {
                styled.push((Style::default(), gap[..at].to_string()));
            }
            styled.push((Color::DarkGray.normal(), gap[at..].to_string()));
        }
        None => styled.push((Style::default(), gap.to_string())),
    }
}

fn token_style(kind: &TokenKind, is_first_session_command: bool) -> Style {
    match kind {
        TokenKind::Ident(_) if is_first_session_command => Color::Cyan.bold(),

        TokenKind::KwInt
        | TokenKind::If
        | TokenKind::Else
        | TokenKind::While
        | TokenKind::Do
        | TokenKind::Return => Color::Blue.bold(),

        TokenKind::Int(_) => Color::Magenta.normal(),

        TokenKind::DocComment(_) => Color::DarkGray.normal(),

        TokenKind::Error(_) => Color::Red.bold(),

        // Operators, identifiers, punctuation
        _ => Style::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_yields_nothing() {
        let result = CrobotsHighlighter.highlight("", 0);
        assert_eq!(result.buffer.len(), 0);
    }

    #[test]
    fn keywords_are_bold_blue() {
        let result = CrobotsHighlighter.highlight("while", 0);
        let (style, text) = &result.buffer[0];
        assert_eq!(text, "while");
        assert_eq!(*style, Color::Blue.bold());
    }

    #[test]
    fn integers_are_magenta() {
        let result = CrobotsHighlighter.highlight("42", 0);
        let (style, text) = &result.buffer[0];
        assert_eq!(text, "42");
        assert_eq!(*style, Color::Magenta.normal());
    }

    #[test]
    fn session_commands_are_cyan() {
        let result = CrobotsHighlighter.highlight("seed 7", 0);
        let (style, text) = &result.buffer[0];
        assert_eq!(text, "seed");
        assert_eq!(*style, Color::Cyan.bold());
    }

    #[test]
    fn ordinary_identifiers_stay_plain() {
        let result = CrobotsHighlighter.highlight("course", 0);
        let (style, text) = &result.buffer[0];
        assert_eq!(text, "course");
        assert_eq!(*style, Style::default());
    }

    #[test]
    fn trailing_comments_are_dimmed() {
        let result = CrobotsHighlighter.highlight("1 + 2 // note", 0);
        let comment = result.buffer.iter().find(|(_, text)| text.contains("note"));
        let (style, _) = comment.expect("comment segment");
        assert_eq!(*style, Color::DarkGray.normal());
    }

    #[test]
    fn bad_characters_are_red() {
        let result = CrobotsHighlighter.highlight("@", 0);
        let (style, text) = &result.buffer[0];
        assert_eq!(text, "@");
        assert_eq!(*style, Color::Red.bold());
    }
}
