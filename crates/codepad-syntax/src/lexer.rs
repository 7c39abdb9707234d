//! Token producer for code pad input.
//!
//! Keywords are lexed as [`TokenKind::Ident`] and recognised by the parser. `>` is
//! always a single token so that nested type argument lists close cleanly; the parser
//! glues adjacent `>` tokens back into shift and comparison operators.

use codepad_types::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    At,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    Question,
    Colon,
    ColonColon,
    Arrow,
    Eq,
    EqEq,
    Bang,
    BangEq,
    Tilde,
    Lt,
    LtEq,
    LtLt,
    LtLtEq,
    Gt,
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    /// Unterminated literal or a character that starts no token.
    Unknown,
}

impl TokenKind {
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral
                | TokenKind::LongLiteral
                | TokenKind::FloatLiteral
                | TokenKind::DoubleLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
        )
    }
}

/// Punctuation, longest first so that greedy matching works.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::LtLtEq),
    ("...", TokenKind::Ellipsis),
    ("::", TokenKind::ColonColon),
    ("->", TokenKind::Arrow),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::BangEq),
    ("<=", TokenKind::LtEq),
    ("<<", TokenKind::LtLt),
    ("++", TokenKind::PlusPlus),
    ("+=", TokenKind::PlusEq),
    ("--", TokenKind::MinusMinus),
    ("-=", TokenKind::MinusEq),
    ("*=", TokenKind::StarEq),
    ("/=", TokenKind::SlashEq),
    ("%=", TokenKind::PercentEq),
    ("&&", TokenKind::AmpAmp),
    ("&=", TokenKind::AmpEq),
    ("||", TokenKind::PipePipe),
    ("|=", TokenKind::PipeEq),
    ("^=", TokenKind::CaretEq),
    ("@", TokenKind::At),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semi),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("=", TokenKind::Eq),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
];

pub fn lex(text: &str) -> Vec<Token> {
    Lexer::new(text).collect()
}

pub struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Lexer { text, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&pred) {
            self.bump_char();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.bump_while(char::is_whitespace);

            let rem = self.remaining();
            if rem.starts_with("//") {
                while let Some(c) = self.bump_char() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }

            // An unterminated block comment is left for `next_token` to reject.
            if rem.starts_with("/*") {
                if let Some(close) = rem[2..].find("*/") {
                    self.pos += close + 4;
                    continue;
                }
            }

            break;
        }
    }

    fn lex_identifier(&mut self) {
        self.bump_while(|c| unicode_ident::is_xid_continue(c) || c == '$');
    }

    /// Consumes a numeric literal starting at the current position.
    fn lex_number(&mut self) -> TokenKind {
        let start = self.pos;
        let hex = matches!(
            (self.peek_char(), self.peek_nth(1)),
            (Some('0'), Some('x' | 'X'))
        );

        if hex {
            self.pos += 2;
            let mut is_float = false;
            loop {
                match self.peek_char() {
                    Some(c) if c.is_ascii_hexdigit() || c == '_' || c == '.' => {
                        is_float |= c == '.';
                        self.bump_char();
                    }
                    Some('p' | 'P') => {
                        is_float = true;
                        self.bump_char();
                        if matches!(self.peek_char(), Some('+' | '-')) {
                            self.bump_char();
                        }
                        self.bump_while(|c| c.is_ascii_digit() || c == '_');
                        break;
                    }
                    _ => break,
                }
            }
            return self.number_suffix(is_float, start);
        }

        let mut is_float = false;
        self.bump_while(|c| c.is_ascii_digit() || c == '_');
        let fraction_follows = self.peek_nth(1).map_or(true, |c| {
            c.is_ascii_digit()
                || matches!(c, 'e' | 'E' | 'f' | 'F' | 'd' | 'D')
                || !(unicode_ident::is_xid_start(c) || c == '_' || c == '$')
        });
        if self.peek_char() == Some('.') && fraction_follows {
            is_float = true;
            self.bump_char();
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            is_float = true;
            self.bump_char();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.bump_char();
            }
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
        }
        self.number_suffix(is_float, start)
    }

    fn number_suffix(&mut self, is_float: bool, start: usize) -> TokenKind {
        let hex = self.text[start..].starts_with("0x") || self.text[start..].starts_with("0X");
        match self.peek_char() {
            Some('l' | 'L') if !is_float => {
                self.bump_char();
                TokenKind::LongLiteral
            }
            Some('f' | 'F') if is_float || !hex => {
                self.bump_char();
                TokenKind::FloatLiteral
            }
            Some('d' | 'D') if is_float || !hex => {
                self.bump_char();
                TokenKind::DoubleLiteral
            }
            _ if is_float => TokenKind::DoubleLiteral,
            _ => TokenKind::IntLiteral,
        }
    }

    /// Consumes a quoted literal whose opening quote was already consumed.
    fn lex_quoted(&mut self, quote: char, kind: TokenKind) -> TokenKind {
        while let Some(c) = self.peek_char() {
            match c {
                '\n' | '\r' => return TokenKind::Unknown,
                '\\' => {
                    self.bump_char();
                    self.bump_char();
                }
                c if c == quote => {
                    self.bump_char();
                    return kind;
                }
                _ => {
                    self.bump_char();
                }
            }
        }
        TokenKind::Unknown
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let ch = self.peek_char()?;

        let kind = match ch {
            '/' if self.remaining().starts_with("/*") => {
                self.pos = self.text.len();
                TokenKind::Unknown
            }
            '"' => {
                self.bump_char();
                self.lex_quoted('"', TokenKind::StringLiteral)
            }
            '\'' => {
                self.bump_char();
                self.lex_quoted('\'', TokenKind::CharLiteral)
            }
            c if c.is_ascii_digit() => self.lex_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(),
            c if unicode_ident::is_xid_start(c) || c == '_' || c == '$' => {
                self.bump_char();
                self.lex_identifier();
                TokenKind::Ident
            }
            _ => match PUNCTUATION
                .iter()
                .find(|(text, _)| self.remaining().starts_with(text))
            {
                Some((text, kind)) => {
                    self.pos += text.len();
                    *kind
                }
                None => {
                    self.bump_char();
                    TokenKind::Unknown
                }
            },
        };

        Some(Token {
            kind,
            text: self.text[start..self.pos].to_owned(),
            range: Span::new(start, self.pos),
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
