use crobots_ast::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),

    // Identifier
    Ident(String),

    /// `/** … */` with the inner text as payload. Ordinary block
    /// comments are skipped; only the doc form survives as a token.
    DocComment(String),

    // Keywords
    KwInt,
    If,
    Else,
    While,
    Do,
    Return,

    // Punctuation
    LParen, // (
    RParen, // )
    LBrace, // {
    RBrace, // }
    Comma,  // ,
    Semi,   // ;

    // Operators
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Bang,       // !
    Eq,         // =
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    EqEq,       // ==
    BangEq,     // !=
    Lt,         // <
    Gt,         // >
    LtEq,       // <=
    GtEq,       // >=
    Shl,        // <<
    Shr,        // >>
    AmpAmp,     // &&
    PipePipe,   // ||
    PlusPlus,   // ++
    MinusMinus, // --

    Eof,

    // Error
    Error(String),
}

impl TokenKind {
    /// Surface spelling used in "expected `…`" diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Int(v) => format!("integer `{v}`"),
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::DocComment(_) => "doc comment".to_string(),
            TokenKind::KwInt => "`int`".to_string(),
            TokenKind::If => "`if`".to_string(),
            TokenKind::Else => "`else`".to_string(),
            TokenKind::While => "`while`".to_string(),
            TokenKind::Do => "`do`".to_string(),
            TokenKind::Return => "`return`".to_string(),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Semi => "`;`".to_string(),
            TokenKind::Plus => "`+`".to_string(),
            TokenKind::Minus => "`-`".to_string(),
            TokenKind::Star => "`*`".to_string(),
            TokenKind::Slash => "`/`".to_string(),
            TokenKind::Percent => "`%`".to_string(),
            TokenKind::Bang => "`!`".to_string(),
            TokenKind::Eq => "`=`".to_string(),
            TokenKind::PlusEq => "`+=`".to_string(),
            TokenKind::MinusEq => "`-=`".to_string(),
            TokenKind::StarEq => "`*=`".to_string(),
            TokenKind::SlashEq => "`/=`".to_string(),
            TokenKind::PercentEq => "`%=`".to_string(),
            TokenKind::EqEq => "`==`".to_string(),
            TokenKind::BangEq => "`!=`".to_string(),
            TokenKind::Lt => "`<`".to_string(),
            TokenKind::Gt => "`>`".to_string(),
            TokenKind::LtEq => "`<=`".to_string(),
            TokenKind::GtEq => "`>=`".to_string(),
            TokenKind::Shl => "`<<`".to_string(),
            TokenKind::Shr => "`>>`".to_string(),
            TokenKind::AmpAmp => "`&&`".to_string(),
            TokenKind::PipePipe => "`||`".to_string(),
            TokenKind::PlusPlus => "`++`".to_string(),
            TokenKind::MinusMinus => "`--`".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Error(msg) => format!("invalid token ({msg})"),
        }
    }

    /// True for tokens that can begin a statement; used by the parser's
    /// resynchronization.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::KwInt
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::Return
                | TokenKind::LBrace
                | TokenKind::Semi
        )
    }
}
