// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Token types for CSS, LESS and SCSS lexical analysis.
//!
//! # Token Structure
//!
//! Each token consists of:
//! - A [`TokenKind`] tag
//! - A [`Channel`]: whitespace and comments travel on [`Channel::Hidden`]
//! - A [`Span`] of byte offsets into the original source
//! - The 1-based line and 0-based column where the token starts
//! - An optional text override (used only for synthesized tokens)
//!
//! Token kinds carry no payload. A token's text is always recovered from the
//! source through [`Token::image`], which keeps exactly one source of truth
//! for both positions and spelling.

use std::fmt;

use ecow::EcoString;

use super::Span;

macro_rules! token_kinds {
    ($($(#[$doc:meta])* $variant:ident => $description:literal,)*) => {
        /// The kind of a token, not including its location.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum TokenKind {
            $($(#[$doc])* $variant,)*
        }

        impl TokenKind {
            /// Every token kind, in declaration order.
            pub const ALL: &'static [TokenKind] = &[$(TokenKind::$variant,)*];

            /// Human-readable description used in diagnostics.
            #[must_use]
            pub const fn description(self) -> &'static str {
                match self {
                    $(TokenKind::$variant => $description,)*
                }
            }
        }
    };
}

token_kinds! {
    // === Names and literals ===
    /// An identifier: `color`, `-webkit-box`, `h1`
    Ident => "identifier",
    /// An at-keyword that is not one of the dedicated keywords: `@font-face`,
    /// and LESS variables such as `@base`
    AtIdent => "at-keyword",
    /// `@import`
    ImportSym => "'@import'",
    /// `@media`
    MediaSym => "'@media'",
    /// `@charset`
    CharsetSym => "'@charset'",
    /// `@namespace`
    NamespaceSym => "'@namespace'",
    /// A hash name: `#id`, `#fff`
    Hash => "hash",
    /// A bare number: `12`, `1.5`, `.5`
    Number => "number",
    /// A percentage: `50%`
    Percentage => "percentage",
    /// A number with a unit: `12px`, `1.5em`
    Dimension => "dimension",
    /// A quoted string: `"a"`, `'b'`
    String => "string",
    /// A `url(...)` reference
    Uri => "url",
    /// `!important`
    ImportantSym => "'!important'",
    /// SCSS variable: `$base`
    ScssVariable => "SCSS variable",
    /// SCSS interpolation opener: `#{`
    ScssInterpolationStart => "'#{'",
    /// LESS interpolation opener: `@{`
    LessInterpolationStart => "'@{'",

    // === Delimiters ===
    /// `{`
    LBrace => "'{'",
    /// `}`
    RBrace => "'}'",
    /// `(`
    LParen => "'('",
    /// `)`
    RParen => "')'",
    /// `[`
    LBracket => "'['",
    /// `]`
    RBracket => "']'",

    // === Punctuation and operators ===
    /// `:`
    Colon => "':'",
    /// `;`
    Semi => "';'",
    /// `,`
    Comma => "','",
    /// `.`
    Dot => "'.'",
    /// `>`
    Greater => "'>'",
    /// `+`
    Plus => "'+'",
    /// `-`
    Minus => "'-'",
    /// `~`
    Tilde => "'~'",
    /// `*`
    Star => "'*'",
    /// `/`
    Solidus => "'/'",
    /// `|`
    Pipe => "'|'",
    /// `=`
    Equals => "'='",
    /// `&`
    Ampersand => "'&'",
    /// `~=`
    Includes => "'~='",
    /// `|=`
    DashMatch => "'|='",
    /// `^=`
    BeginsWith => "'^='",
    /// `$=`
    EndsWith => "'$='",
    /// `*=`
    Contains => "'*='",
    /// `<!--`
    Cdo => "'<!--'",
    /// `-->`
    Cdc => "'-->'",

    // === Hidden channel ===
    /// Whitespace run
    Ws => "whitespace",
    /// `/* ... */`
    Comment => "comment",
    /// `// ...` (LESS and SCSS only)
    LineComment => "line comment",

    // === Special ===
    /// Input that matched no lexical rule
    Invalid => "invalid input",
    /// End of input
    Eof => "end of input",
}

impl TokenKind {
    /// Returns `true` if this is the end-of-input marker.
    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }

    /// Returns `true` if this kind represents unrecognized input.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Returns `true` for kinds that normally travel on the hidden channel.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::Ws | Self::Comment | Self::LineComment)
    }

    /// Returns `true` for the dedicated at-keywords and generic at-keywords.
    #[must_use]
    pub const fn is_at_keyword(self) -> bool {
        matches!(
            self,
            Self::AtIdent | Self::ImportSym | Self::MediaSym | Self::CharsetSym | Self::NamespaceSym
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The channel a token is emitted on.
///
/// The parser only sees [`Channel::Default`] tokens; hidden tokens remain in
/// the recorded token stream so offsets stay contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    /// Tokens the grammar matches against.
    #[default]
    Default,
    /// Whitespace and comments.
    Hidden,
}

/// A token with its kind, channel and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    channel: Channel,
    span: Span,
    line: u32,
    column: u32,
    text: Option<EcoString>,
}

impl Token {
    /// Creates a default-channel token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            channel: Channel::Default,
            span,
            line,
            column,
            text: None,
        }
    }

    /// Returns the token moved to `channel`.
    #[must_use]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }

    /// Returns the token with a text override that [`Token::image`] prefers
    /// over the source substring.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<EcoString>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the token kind.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Returns the token channel.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns true if the token is on the hidden channel.
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.channel, Channel::Hidden)
    }

    /// Returns the token's source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns the 1-based line of the first character.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the 0-based column of the first character.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the text override, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the token's text: the override if present, else the
    /// original-case substring of `source`.
    #[must_use]
    pub fn image<'a>(&'a self, source: &'a str) -> &'a str {
        match &self.text {
            Some(text) => text.as_str(),
            None => source.get(self.span.as_range()).unwrap_or(""),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}@{}..{} {}:{}",
            self.kind,
            self.span.start(),
            self.span.end(),
            self.line,
            self.column
        )
    }
}

/// A set of token kinds, used for follow sets during resynchronization.
///
/// # Examples
///
/// ```
/// use cascade_core::source_analysis::{TokenKind, TokenSet};
///
/// const DECLARATION_FOLLOW: TokenSet = TokenSet::of(&[TokenKind::Semi, TokenKind::RBrace]);
/// assert!(DECLARATION_FOLLOW.contains(TokenKind::Semi));
/// assert!(!DECLARATION_FOLLOW.contains(TokenKind::Ident));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u128);

impl TokenSet {
    /// The empty set: resynchronizing against it consumes to end of input.
    pub const EMPTY: Self = Self(0);

    /// Creates a set from a list of kinds.
    #[must_use]
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1u128 << (kinds[i] as u8);
            i += 1;
        }
        Self(bits)
    }

    /// Returns `true` if `kind` is a member.
    #[must_use]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1u128 << (kind as u8)) != 0
    }

    /// Returns the set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << (kind as u8)))
    }

    /// Returns the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns `true` if no kind is a member.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the member kinds in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds = self.iter();
        match kinds.next() {
            None => f.write_str("nothing"),
            Some(first) => {
                write!(f, "{first}")?;
                for kind in kinds {
                    write!(f, ", {kind}")?;
                }
                Ok(())
            }
        }
    }
}
