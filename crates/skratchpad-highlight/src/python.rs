//! Regex-driven Python lexer.
//!
//! Rules are tried in order at the current position; the first non-empty anchored match wins.
//! Identifiers are then refined by a small amount of state: the name after `def`/`class`,
//! attribute names after `.`, and whether the token starts a line (docstrings and the
//! `match`/`case` soft keywords). F-strings are split so that the expressions inside their
//! braces are lexed like ordinary code.

use crate::token::{KeywordKind, NameKind, NumberKind, StringKind, Token, TokenKind, Tokenizer};
use regex::Regex;
use skratchpad_lang::LanguageConfig;
use thiserror::Error;

/// Failure to build a lexer rule.
#[derive(Debug, Error)]
pub enum LexerError {
    /// A rule's regular expression failed to compile.
    #[error("invalid lexer rule `{rule}`: {source}")]
    InvalidRule {
        /// Rule name.
        rule: &'static str,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Whitespace,
    Continuation,
    Comment,
    String,
    Number(NumberKind),
    Decorator,
    Word,
    Operator,
    Punctuation,
}

#[derive(Debug, Clone)]
struct Rule {
    regex: Regex,
    kind: RuleKind,
}

const STRING_PATTERN: &str = concat!(
    r#"\A(?i:rb|br|fr|rf|b|r|u|f)?"#,
    r#"(?:"""(?s:.*?)(?:"""|\z)"#,
    r#"|'''(?s:.*?)(?:'''|\z)"#,
    r#"|"(?:\\(?s:.)|[^"\\\r\n])*"?"#,
    r#"|'(?:\\(?s:.)|[^'\\\r\n])*'?)"#,
);

const FLOAT_PATTERN: &str = concat!(
    r"\A(?:(?:\d(?:_?\d)*\.(?:\d(?:_?\d)*)?|\.\d(?:_?\d)*)(?:[eE][+-]?\d(?:_?\d)*)?",
    r"|\d(?:_?\d)*[eE][+-]?\d(?:_?\d)*)[jJ]?",
);

const IDENTIFIER: &str = r"[_\p{XID_Start}]\p{XID_Continue}*";

const RESERVED: &[&str] = &[
    "assert", "async", "await", "break", "class", "continue", "def", "del", "elif", "else",
    "except", "finally", "for", "global", "if", "lambda", "nonlocal", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

const CONSTANTS: &[&str] = &["True", "False", "None"];

const NAMESPACE: &[&str] = &["import", "from", "as"];

const OPERATOR_WORDS: &[&str] = &["and", "or", "not", "in", "is"];

const BUILTINS: &[&str] = &[
    "__import__", "abs", "aiter", "all", "anext", "any", "ascii", "bin", "bool", "breakpoint",
    "bytearray", "bytes", "callable", "chr", "classmethod", "compile", "complex", "delattr",
    "dict", "dir", "divmod", "enumerate", "eval", "exec", "filter", "float", "format",
    "frozenset", "getattr", "globals", "hasattr", "hash", "help", "hex", "id", "input", "int",
    "isinstance", "issubclass", "iter", "len", "list", "locals", "map", "max", "memoryview",
    "min", "next", "object", "oct", "open", "ord", "pow", "print", "property", "range", "repr",
    "reversed", "round", "set", "setattr", "slice", "sorted", "staticmethod", "str", "sum",
    "super", "tuple", "type", "vars", "zip",
];

const PSEUDO_BUILTINS: &[&str] = &["self", "cls", "Ellipsis", "NotImplemented", "__debug__"];

const EXCEPTIONS: &[&str] = &[
    "ArithmeticError", "AssertionError", "AttributeError", "BaseException",
    "BaseExceptionGroup", "BlockingIOError", "BrokenPipeError", "BufferError",
    "ChildProcessError", "ConnectionError", "DeprecationWarning", "EOFError", "EnvironmentError",
    "Exception", "ExceptionGroup", "FileExistsError", "FileNotFoundError", "FloatingPointError",
    "FutureWarning", "GeneratorExit", "IOError", "ImportError", "IndentationError", "IndexError",
    "InterruptedError", "IsADirectoryError", "KeyError", "KeyboardInterrupt", "LookupError",
    "MemoryError", "ModuleNotFoundError", "NameError", "NotADirectoryError",
    "NotImplementedError", "OSError", "OverflowError", "PermissionError", "RecursionError",
    "ReferenceError", "RuntimeError", "RuntimeWarning", "StopAsyncIteration", "StopIteration",
    "SyntaxError", "SyntaxWarning", "SystemError", "SystemExit", "TabError", "TimeoutError",
    "TypeError", "UnboundLocalError", "UnicodeDecodeError", "UnicodeEncodeError",
    "UnicodeError", "UserWarning", "ValueError", "Warning", "ZeroDivisionError",
];

const SOFT_KEYWORDS: &[&str] = &["match", "case"];

/// Context carried from one token to the next.
#[derive(Debug, Clone, Copy)]
struct LexState {
    /// Only whitespace seen since the last newline.
    line_start: bool,
    /// The previous significant token was `.`.
    after_dot: bool,
    /// Kind for the next identifier (after `def` / `class`).
    pending: Option<NameKind>,
    /// Inside a `match`/`case` line before its first `_`; a lone `_` there is the wildcard.
    soft_line: bool,
}

impl LexState {
    fn new() -> Self {
        Self {
            line_start: true,
            after_dot: false,
            pending: None,
            soft_line: false,
        }
    }

    /// State for an expression inside f-string braces.
    fn interpolation() -> Self {
        Self {
            line_start: false,
            ..Self::new()
        }
    }

    fn advance(&mut self, kind: TokenKind, text: &str) {
        if kind == TokenKind::Keyword(KeywordKind::Reserved) && SOFT_KEYWORDS.contains(&text) {
            self.soft_line = true;
        } else if text.contains(['_', '\n']) {
            self.soft_line = false;
        }

        match kind {
            TokenKind::Whitespace => {
                if text.contains('\n') {
                    self.line_start = true;
                }
            }
            TokenKind::Text => self.line_start = false,
            _ => {
                self.line_start = false;
                self.after_dot = kind == TokenKind::Punctuation && text == ".";
                self.pending = match (kind, text) {
                    (TokenKind::Keyword(KeywordKind::Reserved), "def") => Some(NameKind::Function),
                    (TokenKind::Keyword(KeywordKind::Reserved), "class") => Some(NameKind::Class),
                    _ => None,
                };
            }
        }
    }
}

/// Python tokenizer.
#[derive(Debug, Clone)]
pub struct PythonLexer {
    language: LanguageConfig,
    rules: Vec<Rule>,
}

impl PythonLexer {
    /// Build the lexer for [`LanguageConfig::python`].
    pub fn new() -> Result<Self, LexerError> {
        Self::with_language(LanguageConfig::python())
    }

    /// Build the lexer using `language`'s comment tokens.
    pub fn with_language(language: LanguageConfig) -> Result<Self, LexerError> {
        let mut patterns: Vec<(&'static str, String, RuleKind)> = vec![
            ("whitespace", r"\A\s+".to_string(), RuleKind::Whitespace),
            (
                "continuation",
                r"\A\\\r?\n".to_string(),
                RuleKind::Continuation,
            ),
        ];
        if language.comments.has_line() {
            let token = language.comments.line.as_deref().unwrap_or_default();
            patterns.push((
                "comment",
                format!(r"\A{}[^\r\n]*", regex::escape(token)),
                RuleKind::Comment,
            ));
        }
        patterns.extend([
            ("string", STRING_PATTERN.to_string(), RuleKind::String),
            (
                "hex",
                r"\A0[xX](?:_?[0-9a-fA-F])+".to_string(),
                RuleKind::Number(NumberKind::Hex),
            ),
            (
                "octal",
                r"\A0[oO](?:_?[0-7])+".to_string(),
                RuleKind::Number(NumberKind::Octal),
            ),
            (
                "binary",
                r"\A0[bB](?:_?[01])+".to_string(),
                RuleKind::Number(NumberKind::Binary),
            ),
            (
                "float",
                FLOAT_PATTERN.to_string(),
                RuleKind::Number(NumberKind::Float),
            ),
            (
                "integer",
                r"\A\d(?:_?\d)*[jJ]?".to_string(),
                RuleKind::Number(NumberKind::Integer),
            ),
            (
                "decorator",
                format!(r"\A@{IDENTIFIER}"),
                RuleKind::Decorator,
            ),
            ("word", format!(r"\A{IDENTIFIER}"), RuleKind::Word),
            (
                "operator",
                r"\A(?:\*\*=?|//=?|<<=?|>>=?|->|:=|!=|[-+*/%&|^=<>@]=?|~)".to_string(),
                RuleKind::Operator,
            ),
            (
                "punctuation",
                r"\A(?:\.\.\.|[()\[\]{}:,;.])".to_string(),
                RuleKind::Punctuation,
            ),
        ]);

        let rules = patterns
            .into_iter()
            .map(|(rule, pattern, kind)| {
                Regex::new(&pattern)
                    .map(|regex| Rule { regex, kind })
                    .map_err(|source| LexerError::InvalidRule { rule, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { language, rules })
    }

    /// Lex the rule match at the start of `rest` into `out`; returns the bytes consumed.
    fn lex_next<'a>(
        &self,
        rest: &'a str,
        state: &mut LexState,
        out: &mut Vec<Token<'a>>,
    ) -> usize {
        for rule in &self.rules {
            let Some(m) = rule.regex.find(rest) else {
                continue;
            };
            if m.is_empty() {
                continue;
            }
            let text = m.as_str();
            let kind = token_kind(rule.kind, text, &rest[text.len()..], state);
            if rule.kind == RuleKind::String && string_prefix(text).contains(['f', 'F']) {
                self.lex_fstring(text, kind, out);
            } else {
                out.push(Token::new(kind, text));
            }
            state.advance(kind, text);
            return text.len();
        }

        let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
        let text = &rest[..len];
        state.advance(TokenKind::Error, text);
        out.push(Token::new(TokenKind::Error, text));
        len
    }

    /// Split an f-string into string pieces and the tokens of each `{...}` expression.
    ///
    /// Braces, conversions such as `!r`, a trailing `=` and format specs stay in the string
    /// pieces. `{{` and `}}` are literal text.
    fn lex_fstring<'a>(&self, literal: &'a str, kind: TokenKind, out: &mut Vec<Token<'a>>) {
        let prefix = string_prefix(literal);
        let raw = prefix.contains(['r', 'R']);
        let body = &literal[prefix.len()..];
        let delim = if is_triple_quoted(body) {
            &body[..3]
        } else {
            &body[..body.chars().next().map_or(0, char::len_utf8)]
        };
        let body_start = prefix.len() + delim.len();
        let body_end = closing_quote(literal, body_start, delim);

        let mut piece_start = 0;
        let mut pos = body_start;
        while pos < body_end {
            let rest = &literal[pos..body_end];
            if rest.starts_with("{{") || rest.starts_with("}}") {
                pos += 2;
            } else if !raw && rest.starts_with('\\') {
                let escaped = rest[1..].chars().next().map_or(0, char::len_utf8);
                pos = (pos + 1 + escaped).min(body_end);
            } else if rest.starts_with('{') {
                out.push(Token::new(kind, &literal[piece_start..=pos]));
                pos += 1;
                pos += self.lex_interpolation(&literal[pos..body_end], out);
                piece_start = pos;
            } else {
                pos += rest.chars().next().map_or(1, char::len_utf8);
            }
        }
        if piece_start < literal.len() {
            out.push(Token::new(kind, &literal[piece_start..]));
        }
    }

    /// Lex the expression after an f-string `{` up to its terminator; returns the bytes
    /// consumed.
    fn lex_interpolation<'a>(&self, expr: &'a str, out: &mut Vec<Token<'a>>) -> usize {
        let mut state = LexState::interpolation();
        let mut depth = 0usize;
        let mut pos = 0;
        while pos < expr.len() {
            let rest = &expr[pos..];
            if depth == 0 && ends_interpolation(rest) {
                break;
            }
            let first = out.len();
            pos += self.lex_next(rest, &mut state, out);
            for token in &out[first..] {
                match (token.kind, token.text) {
                    (TokenKind::Punctuation, "(" | "[" | "{") => depth += 1,
                    (TokenKind::Punctuation, ")" | "]" | "}") => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
        pos
    }
}

impl Tokenizer for PythonLexer {
    fn language(&self) -> &LanguageConfig {
        &self.language
    }

    fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        let mut state = LexState::new();
        let mut rest = text;
        while !rest.is_empty() {
            let len = self.lex_next(rest, &mut state, &mut tokens);
            rest = &rest[len..];
        }
        tokens
    }
}

/// Letters before the opening quote of a string literal.
fn string_prefix(literal: &str) -> &str {
    let len = literal
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(literal.len());
    &literal[..len]
}

/// Byte offset of the unescaped closing `delim` at or after `from`, or the end of `literal`.
fn closing_quote(literal: &str, from: usize, delim: &str) -> usize {
    if delim.is_empty() {
        return literal.len();
    }
    let mut pos = from;
    while pos < literal.len() {
        let rest = &literal[pos..];
        if rest.starts_with(delim) {
            return pos;
        }
        let mut chars = rest.chars();
        pos += match chars.next() {
            Some('\\') => 1 + chars.next().map_or(0, char::len_utf8),
            Some(c) => c.len_utf8(),
            None => 1,
        };
    }
    literal.len()
}

/// Whether `rest` ends an f-string replacement field: `}`, a format spec `:`, a conversion
/// like `!r}`, or a self-documenting `=`.
fn ends_interpolation(rest: &str) -> bool {
    let rest = match rest.strip_prefix('=') {
        Some(after) => after.trim_start(),
        None => rest,
    };
    let rest = match rest.strip_prefix('!') {
        Some(after)
            if after.starts_with(['s', 'r', 'a', 'f']) && after[1..].starts_with(['}', ':']) =>
        {
            &after[1..]
        }
        _ => rest,
    };
    rest.starts_with(['}', ':'])
}

/// Whether `match`/`case` followed by `after` opens a statement rather than naming a value.
fn opens_soft_statement(after: &str) -> bool {
    let next = after.trim_start_matches([' ', '\t']);
    if next.starts_with([':', ',', ';', '=', '^', '&', '|', '@', '~', ')', ']', '}']) {
        return false;
    }
    let len = next
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(next.len());
    let word = &next[..len];
    !(RESERVED.contains(&word) || NAMESPACE.contains(&word) || OPERATOR_WORDS.contains(&word))
}

fn token_kind(rule: RuleKind, text: &str, after: &str, state: &LexState) -> TokenKind {
    match rule {
        RuleKind::Whitespace => TokenKind::Whitespace,
        RuleKind::Continuation => TokenKind::Text,
        RuleKind::Comment => TokenKind::Comment,
        RuleKind::String if state.line_start && is_triple_quoted(text) => {
            TokenKind::String(StringKind::Doc)
        }
        RuleKind::String => TokenKind::String(StringKind::Plain),
        RuleKind::Number(NumberKind::Float | NumberKind::Integer)
            if text.ends_with(['j', 'J']) =>
        {
            TokenKind::Number(NumberKind::Imaginary)
        }
        RuleKind::Number(kind) => TokenKind::Number(kind),
        RuleKind::Decorator => TokenKind::Name(NameKind::Decorator),
        RuleKind::Word => classify_word(text, after, state),
        RuleKind::Operator => TokenKind::Operator,
        RuleKind::Punctuation => TokenKind::Punctuation,
    }
}

fn is_triple_quoted(text: &str) -> bool {
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    body.starts_with(r#"""""#) || body.starts_with("'''")
}

fn classify_word(word: &str, after: &str, state: &LexState) -> TokenKind {
    if RESERVED.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Reserved);
    }
    if CONSTANTS.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Constant);
    }
    if NAMESPACE.contains(&word) {
        return TokenKind::Keyword(KeywordKind::Namespace);
    }
    if OPERATOR_WORDS.contains(&word) {
        return TokenKind::OperatorWord;
    }
    if state.line_start && SOFT_KEYWORDS.contains(&word) && opens_soft_statement(after) {
        return TokenKind::Keyword(KeywordKind::Reserved);
    }
    if state.soft_line && word == "_" {
        return TokenKind::Keyword(KeywordKind::Reserved);
    }
    if let Some(kind) = state.pending {
        return TokenKind::Name(kind);
    }
    if state.after_dot {
        return TokenKind::Name(NameKind::Plain);
    }
    let kind = if BUILTINS.contains(&word) {
        NameKind::Builtin
    } else if PSEUDO_BUILTINS.contains(&word) {
        NameKind::BuiltinPseudo
    } else if EXCEPTIONS.contains(&word) {
        NameKind::Exception
    } else {
        NameKind::Plain
    };
    TokenKind::Name(kind)
}
