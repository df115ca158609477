//! Syntax kinds for the rowan-based CST.
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! It follows the Craft grammar structure: top-level blocks (services,
//! domains, use cases, actors, exposures) over line-oriented bodies.

/// All syntax kinds (tokens and nodes) in the Craft DSL.
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (blocks, definitions, scenarios).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,

    /// Newlines are significant: they terminate triggers, actions, and
    /// service properties, so they are not trivia.
    NEWLINE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,  // identifier (hyphens allowed: service-re-go-vas)
    STRING, // "Create Account"

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE, // {
    R_BRACE, // }
    COLON,   // :
    COMMA,   // ,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    SERVICES_KW,
    USE_CASE_KW,
    DOMAIN_KW,
    DOMAINS_KW,
    DATA_STORES_KW,
    LANGUAGE_KW,
    PARENT_DOMAIN_KW,
    WHEN_KW,
    ASKS_KW,
    NOTIFIES_KW,
    LISTENS_KW,
    ACTOR_KW,
    ACTORS_KW,
    EXPOSURE_KW,

    // =========================================================================
    // COMPOSITE NODES (non-terminals in the grammar)
    // =========================================================================
    // Root
    SOURCE_FILE,

    // Services
    SERVICES_BLOCK,
    SERVICE_DEF,
    DOMAINS_PROPERTY,
    DATA_STORES_PROPERTY,
    LANGUAGE_PROPERTY,
    PARENT_DOMAIN_PROPERTY,

    // Domain groupings
    DOMAIN_DEF,
    DOMAINS_BLOCK,
    SUBDOMAIN,

    // Use cases
    USE_CASE,
    SCENARIO,
    TRIGGER,
    SYNC_ACTION,
    ASYNC_ACTION,
    INTERNAL_ACTION,

    // Actors and exposures
    ACTOR_DEF,
    ACTORS_BLOCK,
    EXPOSURE,
    EXPOSURE_PROPERTY,

    // Shared
    NAME,
    DOMAIN_REF,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace or comment).
    /// Newlines are NOT trivia in this grammar.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::LINE_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::SERVICES_KW as u16) && (self as u16) <= (Self::EXPOSURE_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::COMMA as u16)
    }

    /// Check if this kind can start an action line inside a scenario
    pub fn is_action_start(self) -> bool {
        self == Self::IDENT
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CraftLanguage {}

impl rowan::Language for CraftLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CraftLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CraftLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CraftLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CraftLanguage>;
