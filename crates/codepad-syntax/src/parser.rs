//! Recursive-descent parser over [`crate::lexer`] tokens.
//!
//! Speculative productions (casts, local variable declarations, enhanced `for` headers)
//! save `pos` and restore it on failure; nothing else is mutated, so a failed attempt
//! leaves no trace.
//!
//! Nesting is bounded: every recursive production goes through [`Parser::nested`], and
//! left-folded operator and selector chains count towards the same limit. Input past
//! the limit is a [`ParseError`], never a stack overflow here or in the passes that
//! walk the tree.

use codepad_types::{PrimitiveType, Span};

use crate::ast::{
    ArrayInit, BinaryOp, Block, CatchClause, Expr, ImportDecl, LiteralKind, LocalVarDecl, Stmt,
    SwitchGroup, TypeArgRef, TypeRef, TypeRefKind, TypeSegment, UnaryOp, VarDeclarator, VarInit,
};
use crate::lexer::{Token, TokenKind};
use crate::ParseError;

type PResult<T> = Result<T, ParseError>;

/// Recursive productions open at once (parentheses, prefix operators, casts, blocks,
/// type arguments, array initializers).
const MAX_NESTING: usize = 40;
/// Open productions plus the length of the left-folded chains enclosing the cursor;
/// bounds the depth of the tree handed to later passes.
const MAX_TREE_DEPTH: usize = 128;

const RESERVED: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED.contains(&word)
}

/// An operator found between two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Infix {
    Binary(BinaryOp),
    Assign(Option<BinaryOp>),
    InstanceOf,
}

impl Infix {
    fn precedence(self) -> u8 {
        match self {
            Infix::Assign(_) => 0,
            Infix::Binary(op) => match op {
                BinaryOp::OrOr => 1,
                BinaryOp::AndAnd => 2,
                BinaryOp::BitOr => 3,
                BinaryOp::BitXor => 4,
                BinaryOp::BitAnd => 5,
                BinaryOp::EqEq | BinaryOp::NotEq => 6,
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 7,
                BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => 8,
                BinaryOp::Add | BinaryOp::Sub => 9,
                BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 10,
            },
            Infix::InstanceOf => 7,
        }
    }
}

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Byte length of the source; used for end-of-input spans.
    len: usize,
    nesting: usize,
    chain: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>, len: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            len,
            nesting: 0,
            chain: 0,
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn peek_kind_n(&self, n: usize) -> Option<TokenKind> {
        self.peek_n(n).map(|t| t.kind)
    }

    pub(crate) fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    /// A non-reserved identifier at offset `n`.
    fn at_name_n(&self, n: usize) -> bool {
        self.peek_n(n)
            .is_some_and(|token| token.kind == TokenKind::Ident && !is_reserved(&token.text))
    }

    fn at_primitive(&self) -> Option<PrimitiveType> {
        let token = self.peek()?;
        if token.kind != TokenKind::Ident {
            return None;
        }
        PrimitiveType::from_keyword(&token.text)
    }

    pub(crate) fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(tok)
    }

    fn current_range(&self) -> Span {
        match self.peek() {
            Some(token) => token.range,
            None => Span::new(self.len, self.len),
        }
    }

    fn error<T>(&self, message: impl Into<String>) -> PResult<T> {
        Err(ParseError {
            message: message.into(),
            range: self.current_range(),
        })
    }

    /// Runs one recursive production, failing once nesting is too deep.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.nesting >= MAX_NESTING || self.nesting + self.chain >= MAX_TREE_DEPTH {
            return self.error("expression nested too deeply");
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Counts one more link of a left-folded chain; callers restore `chain` on exit.
    fn extend_chain(&mut self) -> PResult<()> {
        self.chain += 1;
        if self.nesting + self.chain >= MAX_TREE_DEPTH {
            return self.error("expression nested too deeply");
        }
        Ok(())
    }

    fn unexpected<T>(&self, expected: &str) -> PResult<T> {
        match self.peek() {
            Some(token) => self.error(format!("expected {expected}, found `{}`", token.text)),
            None => self.error(format!("expected {expected}, found end of input")),
        }
    }

    pub(crate) fn expect_kind(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.at_kind(kind) {
            if let Some(tok) = self.bump() {
                return Ok(tok);
            }
        }
        self.unexpected(what)
    }

    fn expect_keyword(&mut self, keyword: &str) -> PResult<Token> {
        if self.at_keyword(keyword) {
            if let Some(tok) = self.bump() {
                return Ok(tok);
            }
        }
        self.unexpected(&format!("`{keyword}`"))
    }

    fn expect_name(&mut self) -> PResult<Token> {
        if self.at_name_n(0) {
            if let Some(tok) = self.bump() {
                return Ok(tok);
            }
        }
        self.unexpected("an identifier")
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(0, |t| t.range.end)
    }

    /// `true` when the tokens at `pos + n` and `pos + n + 1` touch.
    fn adjacent(&self, n: usize) -> bool {
        match (self.peek_n(n), self.peek_n(n + 1)) {
            (Some(a), Some(b)) => a.range.end == b.range.start,
            _ => false,
        }
    }

    /// Consumes trailing `;` separators and requires end of input.
    pub(crate) fn finish(&mut self) -> PResult<()> {
        while self.at_kind(TokenKind::Semi) {
            self.bump();
        }
        if self.is_eof() {
            Ok(())
        } else {
            self.unexpected("end of input")
        }
    }

    // ---------------------------------------------------------------------
    // Imports
    // ---------------------------------------------------------------------

    pub(crate) fn parse_import_decl(&mut self) -> PResult<ImportDecl> {
        let kw = self.expect_keyword("import")?;
        let is_static = if self.at_keyword("static") {
            self.bump();
            true
        } else {
            false
        };

        let mut path = self.expect_name()?.text;
        let mut is_star = false;
        while self.at_kind(TokenKind::Dot) {
            self.bump();
            if self.at_kind(TokenKind::Star) {
                self.bump();
                is_star = true;
                break;
            }
            path.push('.');
            path.push_str(&self.expect_name()?.text);
        }
        let semi = self.expect_kind(TokenKind::Semi, "`;`")?;

        if is_static && !is_star && !path.contains('.') {
            return Err(ParseError {
                message: "static import must name a member of a class".to_string(),
                range: Span::new(kw.range.start, semi.range.end),
            });
        }

        Ok(ImportDecl {
            is_static,
            is_star,
            path,
            range: Span::new(kw.range.start, semi.range.end),
        })
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    /// Parses a type with trailing dimensions.
    pub(crate) fn parse_type(&mut self) -> PResult<TypeRef> {
        let mut ty = self.parse_type_no_dims(false)?;
        ty.dims = self.parse_dims();
        ty.range = Span::new(ty.range.start, self.prev_end());
        Ok(ty)
    }

    fn parse_dims(&mut self) -> usize {
        let mut dims = 0;
        while self.at_kind(TokenKind::LBracket) && self.peek_kind_n(1) == Some(TokenKind::RBracket)
        {
            self.pos += 2;
            dims += 1;
        }
        dims
    }

    /// `allow_diamond` accepts `<>` (recorded as an empty argument list) on the last
    /// segment, as in `new ArrayList<>()`.
    fn parse_type_no_dims(&mut self, allow_diamond: bool) -> PResult<TypeRef> {
        let start = self.current_range().start;
        if let Some(prim) = self.at_primitive() {
            let tok = self.bump();
            let end = tok.map_or(start, |t| t.range.end);
            return Ok(TypeRef {
                kind: TypeRefKind::Primitive(prim),
                dims: 0,
                range: Span::new(start, end),
            });
        }

        let mut segments = Vec::new();
        loop {
            let name = self.expect_name()?;
            let args = if self.at_kind(TokenKind::Lt) {
                self.parse_type_args(allow_diamond)?
            } else {
                Vec::new()
            };
            segments.push(TypeSegment {
                name: name.text,
                args,
                range: Span::new(name.range.start, self.prev_end()),
            });

            // Stop before `.class`, `.this` and friends.
            if self.at_kind(TokenKind::Dot) && self.at_name_n(1) {
                self.bump();
                continue;
            }
            break;
        }

        Ok(TypeRef {
            kind: TypeRefKind::Named(segments),
            dims: 0,
            range: Span::new(start, self.prev_end()),
        })
    }

    fn parse_type_args(&mut self, allow_diamond: bool) -> PResult<Vec<TypeArgRef>> {
        self.expect_kind(TokenKind::Lt, "`<`")?;
        let mut args = Vec::new();
        if allow_diamond && self.at_kind(TokenKind::Gt) {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.nested(Self::parse_type_arg)?);
            if self.at_kind(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        self.expect_kind(TokenKind::Gt, "`>`")?;
        Ok(args)
    }

    fn parse_type_arg(&mut self) -> PResult<TypeArgRef> {
        if self.at_kind(TokenKind::Question) {
            self.bump();
            if self.at_keyword("extends") {
                self.bump();
                return Ok(TypeArgRef::Extends(self.parse_reference_type()?));
            }
            if self.at_keyword("super") {
                self.bump();
                return Ok(TypeArgRef::Super(self.parse_reference_type()?));
            }
            return Ok(TypeArgRef::Wildcard);
        }
        Ok(TypeArgRef::Type(self.parse_reference_type()?))
    }

    fn parse_reference_type(&mut self) -> PResult<TypeRef> {
        let ty = self.parse_type()?;
        if matches!(ty.kind, TypeRefKind::Primitive(_)) && ty.dims == 0 {
            return self.error("primitive type argument");
        }
        Ok(ty)
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    /// Block statements up to end of input.
    pub(crate) fn parse_statements_to_eof(&mut self) -> PResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_stmt()?);
        }
        Ok(statements)
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let lbrace = self.expect_kind(TokenKind::LBrace, "`{`")?;
        let mut statements = Vec::new();
        while !self.at_kind(TokenKind::RBrace) {
            if self.is_eof() {
                return self.unexpected("`}`");
            }
            statements.push(self.parse_stmt()?);
        }
        let rbrace = self.expect_kind(TokenKind::RBrace, "`}`")?;
        Ok(Block {
            statements,
            range: Span::new(lbrace.range.start, rbrace.range.end),
        })
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        self.nested(Self::parse_stmt_here)
    }

    fn parse_stmt_here(&mut self) -> PResult<Stmt> {
        if self.at_kind(TokenKind::Semi) {
            let range = self.current_range();
            self.bump();
            return Ok(Stmt::Empty(range));
        }

        if self.at_kind(TokenKind::LBrace) {
            return Ok(Stmt::Block(self.parse_block()?));
        }

        if self.at_kind(TokenKind::Ident) {
            let keyword = self.peek().map(|t| t.text.clone()).unwrap_or_default();
            match keyword.as_str() {
                "if" => return self.parse_if(),
                "while" => {
                    self.bump();
                    let cond = self.parse_paren_expr()?;
                    let body = Box::new(self.parse_stmt()?);
                    return Ok(Stmt::While { cond, body });
                }
                "do" => {
                    self.bump();
                    let body = Box::new(self.parse_stmt()?);
                    self.expect_keyword("while")?;
                    let cond = self.parse_paren_expr()?;
                    self.expect_kind(TokenKind::Semi, "`;`")?;
                    return Ok(Stmt::Do { body, cond });
                }
                "for" => return self.parse_for(),
                "return" => {
                    self.bump();
                    let expr = if self.at_kind(TokenKind::Semi) {
                        None
                    } else {
                        Some(self.parse_expr()?)
                    };
                    self.expect_kind(TokenKind::Semi, "`;`")?;
                    return Ok(Stmt::Return(expr));
                }
                "throw" => {
                    self.bump();
                    let expr = self.parse_expr()?;
                    self.expect_kind(TokenKind::Semi, "`;`")?;
                    return Ok(Stmt::Throw(expr));
                }
                "break" | "continue" => {
                    self.bump();
                    let label = if self.at_name_n(0) {
                        self.bump().map(|t| t.text)
                    } else {
                        None
                    };
                    self.expect_kind(TokenKind::Semi, "`;`")?;
                    return Ok(if keyword == "break" {
                        Stmt::Break(label)
                    } else {
                        Stmt::Continue(label)
                    });
                }
                "try" => return self.parse_try(),
                "switch" => return self.parse_switch(),
                "synchronized" => {
                    self.bump();
                    let lock = self.parse_paren_expr()?;
                    let body = self.parse_block()?;
                    return Ok(Stmt::Synchronized { lock, body });
                }
                "class" | "interface" | "enum" | "abstract" | "static" => {
                    return self.error("type declarations are not supported here");
                }
                "else" | "case" | "default" | "catch" | "finally" => {
                    return self.unexpected("a statement");
                }
                _ => {}
            }

            if self.at_name_n(0) && self.peek_kind_n(1) == Some(TokenKind::Colon) {
                let label = self.bump().map(|t| t.text).unwrap_or_default();
                self.bump();
                let body = Box::new(self.parse_stmt()?);
                return Ok(Stmt::Labeled { label, body });
            }
        }

        if let Some(decl) = self.try_parse_local_var_decl()? {
            self.expect_kind(TokenKind::Semi, "`;`")?;
            return Ok(Stmt::LocalVar(decl));
        }

        let expr = self.parse_expr()?;
        if !expr.is_statement_expression() {
            return Err(ParseError {
                message: "not a statement".to_string(),
                range: expr.range(),
            });
        }
        self.expect_kind(TokenKind::Semi, "`;`")?;
        Ok(Stmt::Expr(expr))
    }

    fn parse_paren_expr(&mut self) -> PResult<Expr> {
        self.expect_kind(TokenKind::LParen, "`(`")?;
        let expr = self.parse_expr()?;
        self.expect_kind(TokenKind::RParen, "`)`")?;
        Ok(expr)
    }

    fn parse_if(&mut self) -> PResult<Stmt> {
        self.expect_keyword("if")?;
        let cond = self.parse_paren_expr()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.at_keyword("else") {
            self.bump();
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn parse_for(&mut self) -> PResult<Stmt> {
        self.expect_keyword("for")?;
        self.expect_kind(TokenKind::LParen, "`(`")?;

        // Enhanced for: `[final] Type name : expr`.
        let start_pos = self.pos;
        let start = self.current_range().start;
        let is_final = self.skip_final();
        if let Ok(ty) = self.parse_type() {
            if self.at_name_n(0) && self.peek_kind_n(1) == Some(TokenKind::Colon) {
                let name = self.expect_name()?;
                self.bump();
                let iterable = self.parse_expr()?;
                self.expect_kind(TokenKind::RParen, "`)`")?;
                let body = Box::new(self.parse_stmt()?);
                let var = LocalVarDecl {
                    is_final,
                    ty,
                    declarators: vec![VarDeclarator {
                        name: name.text,
                        dims: 0,
                        init: None,
                        range: name.range,
                    }],
                    range: Span::new(start, name.range.end),
                };
                return Ok(Stmt::ForEach {
                    var,
                    iterable,
                    body,
                });
            }
        }
        self.pos = start_pos;

        let mut init = Vec::new();
        if !self.at_kind(TokenKind::Semi) {
            if let Some(decl) = self.try_parse_local_var_decl()? {
                init.push(Stmt::LocalVar(decl));
            } else {
                for expr in self.parse_statement_expr_list()? {
                    init.push(Stmt::Expr(expr));
                }
            }
        }
        self.expect_kind(TokenKind::Semi, "`;`")?;

        let cond = if self.at_kind(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_kind(TokenKind::Semi, "`;`")?;

        let update = if self.at_kind(TokenKind::RParen) {
            Vec::new()
        } else {
            self.parse_statement_expr_list()?
        };
        self.expect_kind(TokenKind::RParen, "`)`")?;
        let body = Box::new(self.parse_stmt()?);

        Ok(Stmt::For {
            init,
            cond,
            update,
            body,
        })
    }

    fn parse_statement_expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = Vec::new();
        loop {
            let expr = self.parse_expr()?;
            if !expr.is_statement_expression() {
                return Err(ParseError {
                    message: "not a statement".to_string(),
                    range: expr.range(),
                });
            }
            exprs.push(expr);
            if self.at_kind(TokenKind::Comma) {
                self.bump();
                continue;
            }
            return Ok(exprs);
        }
    }

    fn parse_try(&mut self) -> PResult<Stmt> {
        self.expect_keyword("try")?;
        if self.at_kind(TokenKind::LParen) {
            return self.error("try-with-resources is not supported");
        }
        let body = self.parse_block()?;

        let mut catches = Vec::new();
        while self.at_keyword("catch") {
            self.bump();
            self.expect_kind(TokenKind::LParen, "`(`")?;
            self.skip_final();
            let mut types = vec![self.parse_type()?];
            while self.at_kind(TokenKind::Pipe) {
                self.bump();
                types.push(self.parse_type()?);
            }
            let name = self.expect_name()?.text;
            self.expect_kind(TokenKind::RParen, "`)`")?;
            let body = self.parse_block()?;
            catches.push(CatchClause { types, name, body });
        }

        let finally = if self.at_keyword("finally") {
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };

        if catches.is_empty() && finally.is_none() {
            return self.unexpected("`catch` or `finally`");
        }

        Ok(Stmt::Try {
            body,
            catches,
            finally,
        })
    }

    fn parse_switch(&mut self) -> PResult<Stmt> {
        self.expect_keyword("switch")?;
        let selector = self.parse_paren_expr()?;
        self.expect_kind(TokenKind::LBrace, "`{`")?;

        let mut groups: Vec<SwitchGroup> = Vec::new();
        while !self.at_kind(TokenKind::RBrace) {
            let mut labels = Vec::new();
            while self.at_keyword("case") || self.at_keyword("default") {
                if self.at_keyword("default") {
                    self.bump();
                    labels.push(None);
                } else {
                    self.bump();
                    labels.push(Some(self.parse_conditional()?));
                }
                self.expect_kind(TokenKind::Colon, "`:`")?;
            }
            if labels.is_empty() {
                return self.unexpected("`case` or `default`");
            }

            let mut body = Vec::new();
            while !self.at_kind(TokenKind::RBrace)
                && !self.at_keyword("case")
                && !self.at_keyword("default")
            {
                if self.is_eof() {
                    return self.unexpected("`}`");
                }
                body.push(self.parse_stmt()?);
            }
            groups.push(SwitchGroup { labels, body });
        }
        self.expect_kind(TokenKind::RBrace, "`}`")?;

        Ok(Stmt::Switch { selector, groups })
    }

    fn skip_final(&mut self) -> bool {
        let mut is_final = false;
        while self.at_keyword("final") {
            self.bump();
            is_final = true;
        }
        is_final
    }

    /// Tries `[final] Type name ...`. Returns `Ok(None)` (with `pos` restored) when the
    /// tokens do not start a declaration; once the type and first name are seen, errors
    /// in the declarators are real errors.
    fn try_parse_local_var_decl(&mut self) -> PResult<Option<LocalVarDecl>> {
        let start_pos = self.pos;
        let start = self.current_range().start;
        let is_final = self.skip_final();

        let ty = match self.parse_type() {
            Ok(ty) => ty,
            Err(err) => {
                if is_final {
                    return Err(err);
                }
                self.pos = start_pos;
                return Ok(None);
            }
        };

        let commits = self.at_name_n(0)
            && matches!(
                self.peek_kind_n(1),
                Some(TokenKind::Eq | TokenKind::Semi | TokenKind::Comma | TokenKind::LBracket)
            );
        if !commits {
            if is_final {
                return self.unexpected("a variable declaration");
            }
            self.pos = start_pos;
            return Ok(None);
        }

        let mut declarators = Vec::new();
        loop {
            let name = self.expect_name()?;
            let dims = self.parse_dims();
            let init = if self.at_kind(TokenKind::Eq) {
                self.bump();
                Some(self.parse_var_init()?)
            } else {
                None
            };
            declarators.push(VarDeclarator {
                name: name.text,
                dims,
                init,
                range: Span::new(name.range.start, self.prev_end()),
            });
            if self.at_kind(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }

        Ok(Some(LocalVarDecl {
            is_final,
            ty,
            declarators,
            range: Span::new(start, self.prev_end()),
        }))
    }

    fn parse_var_init(&mut self) -> PResult<VarInit> {
        if self.at_kind(TokenKind::LBrace) {
            Ok(VarInit::Array(self.nested(Self::parse_array_init)?))
        } else {
            Ok(VarInit::Expr(self.parse_expr()?))
        }
    }

    fn parse_array_init(&mut self) -> PResult<ArrayInit> {
        let lbrace = self.expect_kind(TokenKind::LBrace, "`{`")?;
        let mut elements = Vec::new();
        while !self.at_kind(TokenKind::RBrace) {
            elements.push(self.parse_var_init()?);
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        let rbrace = self.expect_kind(TokenKind::RBrace, "`}`")?;
        Ok(ArrayInit {
            elements,
            range: Span::new(lbrace.range.start, rbrace.range.end),
        })
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    /// Reads the operator at the cursor, gluing adjacent `>` tokens into shifts and
    /// `>=`. Returns the operator and how many tokens it spans.
    fn peek_infix(&self) -> Option<(Infix, usize)> {
        use TokenKind as K;

        let kind = self.peek_kind_n(0)?;
        if kind == K::Gt {
            let glued = |n: usize, k: K| self.peek_kind_n(n) == Some(k) && self.adjacent(n - 1);
            if glued(1, K::Gt) {
                if glued(2, K::Gt) {
                    if glued(3, K::Eq) {
                        return Some((Infix::Assign(Some(BinaryOp::UShr)), 4));
                    }
                    return Some((Infix::Binary(BinaryOp::UShr), 3));
                }
                if glued(2, K::Eq) {
                    return Some((Infix::Assign(Some(BinaryOp::Shr)), 3));
                }
                return Some((Infix::Binary(BinaryOp::Shr), 2));
            }
            if glued(1, K::Eq) {
                return Some((Infix::Binary(BinaryOp::Ge), 2));
            }
            return Some((Infix::Binary(BinaryOp::Gt), 1));
        }

        let infix = match kind {
            K::PipePipe => Infix::Binary(BinaryOp::OrOr),
            K::AmpAmp => Infix::Binary(BinaryOp::AndAnd),
            K::Pipe => Infix::Binary(BinaryOp::BitOr),
            K::Caret => Infix::Binary(BinaryOp::BitXor),
            K::Amp => Infix::Binary(BinaryOp::BitAnd),
            K::EqEq => Infix::Binary(BinaryOp::EqEq),
            K::BangEq => Infix::Binary(BinaryOp::NotEq),
            K::Lt => Infix::Binary(BinaryOp::Lt),
            K::LtEq => Infix::Binary(BinaryOp::Le),
            K::LtLt => Infix::Binary(BinaryOp::Shl),
            K::Plus => Infix::Binary(BinaryOp::Add),
            K::Minus => Infix::Binary(BinaryOp::Sub),
            K::Star => Infix::Binary(BinaryOp::Mul),
            K::Slash => Infix::Binary(BinaryOp::Div),
            K::Percent => Infix::Binary(BinaryOp::Rem),
            K::Eq => Infix::Assign(None),
            K::PlusEq => Infix::Assign(Some(BinaryOp::Add)),
            K::MinusEq => Infix::Assign(Some(BinaryOp::Sub)),
            K::StarEq => Infix::Assign(Some(BinaryOp::Mul)),
            K::SlashEq => Infix::Assign(Some(BinaryOp::Div)),
            K::PercentEq => Infix::Assign(Some(BinaryOp::Rem)),
            K::AmpEq => Infix::Assign(Some(BinaryOp::BitAnd)),
            K::PipeEq => Infix::Assign(Some(BinaryOp::BitOr)),
            K::CaretEq => Infix::Assign(Some(BinaryOp::BitXor)),
            K::LtLtEq => Infix::Assign(Some(BinaryOp::Shl)),
            K::Ident if self.at_keyword("instanceof") => Infix::InstanceOf,
            _ => return None,
        };
        Some((infix, 1))
    }

    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.nested(Self::parse_assignment)
    }

    fn parse_assignment(&mut self) -> PResult<Expr> {
        let lhs = self.parse_conditional()?;
        let Some((Infix::Assign(op), width)) = self.peek_infix() else {
            return Ok(lhs);
        };

        if !matches!(
            lhs,
            Expr::Name { .. } | Expr::FieldAccess { .. } | Expr::ArrayAccess { .. }
        ) {
            return self.error("invalid assignment target");
        }
        self.pos += width;
        let value = self.parse_expr()?;
        let range = lhs.range().cover(value.range());
        Ok(Expr::Assign {
            op,
            target: Box::new(lhs),
            value: Box::new(value),
            range,
        })
    }

    fn parse_conditional(&mut self) -> PResult<Expr> {
        let cond = self.parse_binary_expr(1)?;
        if !self.at_kind(TokenKind::Question) {
            return Ok(cond);
        }
        self.bump();
        let then_expr = self.parse_expr()?;
        self.expect_kind(TokenKind::Colon, "`:`")?;
        let else_expr = self.nested(Self::parse_conditional)?;
        let range = cond.range().cover(else_expr.range());
        Ok(Expr::Conditional {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            range,
        })
    }

    fn parse_binary_expr(&mut self, min_prec: u8) -> PResult<Expr> {
        let chain = self.chain;
        let result = self.parse_binary_chain(min_prec);
        self.chain = chain;
        result
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> PResult<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let Some((infix, width)) = self.peek_infix() else {
                break;
            };
            let prec = infix.precedence();
            if prec == 0 || prec < min_prec {
                break;
            }
            self.pos += width;
            self.extend_chain()?;

            lhs = match infix {
                Infix::InstanceOf => {
                    let ty = self.parse_type()?;
                    let range = lhs.range().cover(ty.range);
                    Expr::InstanceOf {
                        expr: Box::new(lhs),
                        ty,
                        range,
                    }
                }
                Infix::Binary(op) => {
                    let rhs = self.parse_binary_expr(prec + 1)?;
                    let range = lhs.range().cover(rhs.range());
                    Expr::Binary {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        range,
                    }
                }
                Infix::Assign(_) => break,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<Expr> {
        let op = match self.peek_kind_n(0) {
            Some(TokenKind::Plus) => Some(UnaryOp::Plus),
            Some(TokenKind::Minus) => Some(UnaryOp::Minus),
            Some(TokenKind::Tilde) => Some(UnaryOp::BitNot),
            Some(TokenKind::Bang) => Some(UnaryOp::Not),
            Some(TokenKind::PlusPlus) => Some(UnaryOp::PreInc),
            Some(TokenKind::MinusMinus) => Some(UnaryOp::PreDec),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.current_range().start;
            self.bump();
            let expr = self.nested(Self::parse_unary)?;
            let range = Span::new(start, expr.range().end);
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
                range,
            });
        }

        if self.at_kind(TokenKind::LParen) {
            if let Some(cast) = self.try_parse_cast()? {
                return Ok(cast);
            }
        }

        self.parse_postfix_expr()
    }

    /// JLS 15.16: `(primitive) unary` or `(Reference) unaryNotPlusMinus`.
    fn try_parse_cast(&mut self) -> PResult<Option<Expr>> {
        let start_pos = self.pos;
        let Some(lparen) = self.bump() else {
            return Ok(None);
        };

        let ty = match self.parse_type() {
            Ok(ty) if self.at_kind(TokenKind::RParen) => ty,
            _ => {
                self.pos = start_pos;
                return Ok(None);
            }
        };
        self.bump();

        let primitive = matches!(ty.kind, TypeRefKind::Primitive(_)) && ty.dims == 0;
        let operand_follows = match self.peek() {
            None => false,
            Some(tok) if primitive => !matches!(
                tok.kind,
                TokenKind::RParen
                    | TokenKind::Semi
                    | TokenKind::Comma
                    | TokenKind::Dot
                    | TokenKind::RBracket
                    | TokenKind::RBrace
            ),
            Some(tok) => match tok.kind {
                TokenKind::Ident => tok.text != "instanceof",
                TokenKind::LParen | TokenKind::Bang | TokenKind::Tilde => true,
                kind => kind.is_literal(),
            },
        };
        if !operand_follows {
            self.pos = start_pos;
            return Ok(None);
        }

        let expr = self.nested(Self::parse_unary)?;
        let range = Span::new(lparen.range.start, expr.range().end);
        Ok(Some(Expr::Cast {
            ty,
            expr: Box::new(expr),
            range,
        }))
    }

    fn parse_postfix_expr(&mut self) -> PResult<Expr> {
        let chain = self.chain;
        let result = self.parse_selectors();
        self.chain = chain;
        result
    }

    fn parse_selectors(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_primary_expr()?;
        loop {
            if self.at_kind(TokenKind::Dot) || self.at_kind(TokenKind::LBracket) {
                self.extend_chain()?;
            }
            if self.at_kind(TokenKind::Dot) {
                self.bump();

                if self.at_keyword("class") {
                    let kw = self.bump();
                    let ty = self.expr_as_type(&expr, 0)?;
                    let end = kw.map_or(expr.range().end, |t| t.range.end);
                    expr = Expr::ClassLiteral {
                        ty,
                        range: Span::new(expr.range().start, end),
                    };
                    continue;
                }

                let type_args = if self.at_kind(TokenKind::Lt) {
                    self.parse_type_args(false)?
                } else {
                    Vec::new()
                };
                let name = self.expect_name()?;
                if self.at_kind(TokenKind::LParen) {
                    let (args, end) = self.parse_arg_list()?;
                    let range = Span::new(expr.range().start, end);
                    expr = Expr::MethodCall {
                        receiver: Some(Box::new(expr)),
                        type_args,
                        name: name.text,
                        args,
                        range,
                    };
                } else if !type_args.is_empty() {
                    return self.unexpected("`(`");
                } else {
                    let range = Span::new(expr.range().start, name.range.end);
                    expr = Expr::FieldAccess {
                        receiver: Box::new(expr),
                        name: name.text,
                        range,
                    };
                }
                continue;
            }

            if self.at_kind(TokenKind::LBracket) {
                // `Name[].class`
                if self.peek_kind_n(1) == Some(TokenKind::RBracket) {
                    let dims = self.parse_dims();
                    self.expect_kind(TokenKind::Dot, "`.`")?;
                    let kw = self.expect_keyword("class")?;
                    let ty = self.expr_as_type(&expr, dims)?;
                    expr = Expr::ClassLiteral {
                        ty,
                        range: Span::new(expr.range().start, kw.range.end),
                    };
                    continue;
                }
                self.bump();
                let index = self.parse_expr()?;
                let rbracket = self.expect_kind(TokenKind::RBracket, "`]`")?;
                let range = Span::new(expr.range().start, rbracket.range.end);
                expr = Expr::ArrayAccess {
                    array: Box::new(expr),
                    index: Box::new(index),
                    range,
                };
                continue;
            }

            let op = match self.peek_kind_n(0) {
                Some(TokenKind::PlusPlus) => UnaryOp::PostInc,
                Some(TokenKind::MinusMinus) => UnaryOp::PostDec,
                _ => break,
            };
            self.extend_chain()?;
            let tok = self.bump();
            let end = tok.map_or(expr.range().end, |t| t.range.end);
            let range = Span::new(expr.range().start, end);
            expr = Expr::Unary {
                op,
                expr: Box::new(expr),
                range,
            };
        }
        Ok(expr)
    }

    /// Reinterprets a dotted name expression as a type (for `a.b.C.class`).
    fn expr_as_type(&self, expr: &Expr, dims: usize) -> PResult<TypeRef> {
        let Some(name) = expr.dotted_name() else {
            return Err(ParseError {
                message: "expected a type before `.class`".to_string(),
                range: expr.range(),
            });
        };
        let range = expr.range();
        let segments = name
            .split('.')
            .map(|segment| TypeSegment {
                name: segment.to_string(),
                args: Vec::new(),
                range,
            })
            .collect();
        Ok(TypeRef {
            kind: TypeRefKind::Named(segments),
            dims,
            range,
        })
    }

    fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let Some(tok) = self.peek().cloned() else {
            return self.unexpected("an expression");
        };

        let literal = match tok.kind {
            TokenKind::IntLiteral => Some(LiteralKind::Int),
            TokenKind::LongLiteral => Some(LiteralKind::Long),
            TokenKind::FloatLiteral => Some(LiteralKind::Float),
            TokenKind::DoubleLiteral => Some(LiteralKind::Double),
            TokenKind::CharLiteral => Some(LiteralKind::Char),
            TokenKind::StringLiteral => Some(LiteralKind::String),
            TokenKind::Ident => match tok.text.as_str() {
                "true" => Some(LiteralKind::True),
                "false" => Some(LiteralKind::False),
                "null" => Some(LiteralKind::Null),
                _ => None,
            },
            _ => None,
        };
        if let Some(kind) = literal {
            self.bump();
            return Ok(Expr::Literal {
                kind,
                text: tok.text,
                range: tok.range,
            });
        }

        match tok.kind {
            TokenKind::LParen => {
                self.bump();
                let expr = self.parse_expr()?;
                let rparen = self.expect_kind(TokenKind::RParen, "`)`")?;
                Ok(Expr::Paren {
                    expr: Box::new(expr),
                    range: Span::new(tok.range.start, rparen.range.end),
                })
            }
            TokenKind::Ident => match tok.text.as_str() {
                "this" => {
                    self.bump();
                    if self.at_kind(TokenKind::LParen) {
                        return self.error("constructor invocation is not supported here");
                    }
                    Ok(Expr::This(tok.range))
                }
                "super" => {
                    self.bump();
                    if !self.at_kind(TokenKind::Dot) {
                        return self.unexpected("`.`");
                    }
                    Ok(Expr::Super(tok.range))
                }
                "new" => self.parse_new(),
                "void" => {
                    self.bump();
                    self.expect_kind(TokenKind::Dot, "`.`")?;
                    let kw = self.expect_keyword("class")?;
                    Ok(Expr::ClassLiteral {
                        ty: TypeRef {
                            kind: TypeRefKind::Void,
                            dims: 0,
                            range: tok.range,
                        },
                        range: Span::new(tok.range.start, kw.range.end),
                    })
                }
                text if PrimitiveType::from_keyword(text).is_some() => {
                    let ty = self.parse_type()?;
                    self.expect_kind(TokenKind::Dot, "`.`")?;
                    let kw = self.expect_keyword("class")?;
                    Ok(Expr::ClassLiteral {
                        ty,
                        range: Span::new(tok.range.start, kw.range.end),
                    })
                }
                text if is_reserved(text) => self.unexpected("an expression"),
                _ => {
                    self.bump();
                    if self.at_kind(TokenKind::LParen) {
                        let (args, end) = self.parse_arg_list()?;
                        return Ok(Expr::MethodCall {
                            receiver: None,
                            type_args: Vec::new(),
                            name: tok.text,
                            args,
                            range: Span::new(tok.range.start, end),
                        });
                    }
                    Ok(Expr::Name {
                        name: tok.text,
                        range: tok.range,
                    })
                }
            },
            _ => self.unexpected("an expression"),
        }
    }

    fn parse_new(&mut self) -> PResult<Expr> {
        let kw = self.expect_keyword("new")?;
        if self.at_kind(TokenKind::Lt) {
            return self.error("explicit constructor type arguments are not supported");
        }
        let elem = self.parse_type_no_dims(true)?;

        if self.at_kind(TokenKind::LBracket) {
            let mut dim_exprs = Vec::new();
            while self.at_kind(TokenKind::LBracket)
                && self.peek_kind_n(1) != Some(TokenKind::RBracket)
            {
                self.bump();
                dim_exprs.push(self.parse_expr()?);
                self.expect_kind(TokenKind::RBracket, "`]`")?;
            }
            let extra_dims = self.parse_dims();
            let init = if dim_exprs.is_empty() {
                if extra_dims == 0 {
                    return self.unexpected("`]`");
                }
                Some(self.parse_array_init()?)
            } else {
                None
            };
            return Ok(Expr::NewArray {
                elem,
                dim_exprs,
                extra_dims,
                init,
                range: Span::new(kw.range.start, self.prev_end()),
            });
        }

        if matches!(elem.kind, TypeRefKind::Primitive(_)) {
            return self.unexpected("`[`");
        }

        let (args, mut end) = self.parse_arg_list()?;
        let has_body = self.at_kind(TokenKind::LBrace);
        if has_body {
            end = self.skip_balanced_braces()?;
        }
        Ok(Expr::New {
            ty: elem,
            args,
            has_body,
            range: Span::new(kw.range.start, end),
        })
    }

    /// Skips an anonymous class body; returns the end offset of the closing brace.
    fn skip_balanced_braces(&mut self) -> PResult<usize> {
        let mut depth = 0usize;
        while let Some(tok) = self.bump() {
            match tok.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(tok.range.end);
                    }
                }
                _ => {}
            }
        }
        self.unexpected("`}`")
    }

    fn parse_arg_list(&mut self) -> PResult<(Vec<Expr>, usize)> {
        self.expect_kind(TokenKind::LParen, "`(`")?;
        let mut args = Vec::new();
        if !self.at_kind(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if self.at_kind(TokenKind::Comma) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        let rparen = self.expect_kind(TokenKind::RParen, "`)`")?;
        Ok((args, rparen.range.end))
    }
}
