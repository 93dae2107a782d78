use reedline::{ValidationResult, Validator};

/// Decides whether a line of input is complete or needs continuation.
///
/// Returns `Incomplete` while `{` or `(` is unclosed, or while a block
/// comment is still open, so function bodies can span multiple lines.
pub struct CrobotsValidator;

impl Validator for CrobotsValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        if has_unclosed_delimiters(line) {
            ValidationResult::Incomplete
        } else {
            ValidationResult::Complete
        }
    }
}

/// Counts unmatched `{` and `(`, ignoring comment interiors.
///
/// Separate counters per delimiter type so a stray closer (e.g. `)`)
/// never cancels an unrelated opener (e.g. `{`).
fn has_unclosed_delimiters(line: &str) -> bool {
    let mut parens = 0u32;
    let mut braces = 0u32;
    let mut comment_depth = 0u32;
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if comment_depth > 0 {
            if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                comment_depth -= 1;
                i += 2;
                continue;
            }
            if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                comment_depth += 1;
                i += 2;
                continue;
            }
        } else {
            match bytes[i] {
                b'(' => parens += 1,
                b')' => {
                    parens = parens.saturating_sub(1);
                }
                b'{' => braces += 1,
                b'}' => {
                    braces = braces.saturating_sub(1);
                }
                b'/' if bytes.get(i + 1) == Some(&b'/') => {
                    // Line comment, skip to end of line
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    comment_depth += 1;
                    i += 2;
                    continue;
                }
                _ => {}
            }
        }
        i += 1;
    }

    comment_depth > 0 || parens > 0 || braces > 0
}
