//! Tokens and the tokenizer seam.

use skratchpad_lang::LanguageConfig;

/// Keyword flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    /// Reserved words such as `def`, `return`, `while`.
    Reserved,
    /// `True`, `False`, `None`.
    Constant,
    /// `import`, `from`, `as`.
    Namespace,
}

/// String literal flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// Any literal that is not a docstring.
    Plain,
    /// Triple-quoted literal at the start of a line.
    Doc,
}

/// Numeric literal flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberKind {
    /// Decimal integer.
    Integer,
    /// Float, with or without exponent.
    Float,
    /// `0x...`
    Hex,
    /// `0o...`
    Octal,
    /// `0b...`
    Binary,
    /// Integer or float with a `j` suffix.
    Imaginary,
}

/// Identifier flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Any other identifier.
    Plain,
    /// The name after `def`.
    Function,
    /// The name after `class`.
    Class,
    /// `@decorator` (including the `@`).
    Decorator,
    /// A builtin exception class such as `ValueError`.
    Exception,
    /// A builtin function or type such as `len` or `str`.
    Builtin,
    /// `self`, `cls` and similar pseudo-builtins.
    BuiltinPseudo,
}

/// Kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Spaces, tabs and newlines.
    Whitespace,
    /// Text without a more specific kind (e.g. a line continuation).
    Text,
    /// Keyword.
    Keyword(KeywordKind),
    /// String literal.
    String(StringKind),
    /// Comment.
    Comment,
    /// Numeric literal.
    Number(NumberKind),
    /// Identifier.
    Name(NameKind),
    /// Symbolic operator.
    Operator,
    /// `and`, `or`, `not`, `in`, `is`.
    OperatorWord,
    /// Brackets, separators, `.`.
    Punctuation,
    /// A character the lexer does not recognize.
    Error,
}

/// A classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// The token's text, borrowed from the input.
    pub text: &'a str,
}

impl<'a> Token<'a> {
    /// Create a token.
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns `true` if the token consists only of whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A lexer for one fixed language.
///
/// Implementations must be total: every input produces tokens whose texts, concatenated in
/// order, reproduce the input exactly.
pub trait Tokenizer {
    /// The language this tokenizer lexes.
    fn language(&self) -> &LanguageConfig;

    /// Split `text` into tokens.
    fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>>;
}
