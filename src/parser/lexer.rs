//! Logos-based lexer for the Craft DSL
//!
//! Fast tokenization using the logos crate.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
///
/// Keywords carry an explicit priority so they beat the identifier regex on
/// equal-length matches; a longer identifier (`domains_x`) still wins.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_-]*")]
    Ident,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("services", priority = 20)]
    ServicesKw,
    #[token("use_case", priority = 20)]
    UseCaseKw,
    #[token("domain", priority = 20)]
    DomainKw,
    #[token("domains", priority = 20)]
    DomainsKw,
    #[token("data-stores", priority = 24)]
    DataStoresKw,
    #[token("language", priority = 20)]
    LanguageKw,
    #[token("parent-domain", priority = 28)]
    ParentDomainKw,
    #[token("when", priority = 20)]
    WhenKw,
    #[token("asks", priority = 20)]
    AsksKw,
    #[token("notifies", priority = 20)]
    NotifiesKw,
    #[token("listens", priority = 20)]
    ListensKw,
    #[token("actor", priority = 20)]
    ActorKw,
    #[token("actors", priority = 20)]
    ActorsKw,
    #[token("exposure", priority = 20)]
    ExposureKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => SyntaxKind::WHITESPACE,
            LogosToken::Newline => SyntaxKind::NEWLINE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::String => SyntaxKind::STRING,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::Colon => SyntaxKind::COLON,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::ServicesKw => SyntaxKind::SERVICES_KW,
            LogosToken::UseCaseKw => SyntaxKind::USE_CASE_KW,
            LogosToken::DomainKw => SyntaxKind::DOMAIN_KW,
            LogosToken::DomainsKw => SyntaxKind::DOMAINS_KW,
            LogosToken::DataStoresKw => SyntaxKind::DATA_STORES_KW,
            LogosToken::LanguageKw => SyntaxKind::LANGUAGE_KW,
            LogosToken::ParentDomainKw => SyntaxKind::PARENT_DOMAIN_KW,
            LogosToken::WhenKw => SyntaxKind::WHEN_KW,
            LogosToken::AsksKw => SyntaxKind::ASKS_KW,
            LogosToken::NotifiesKw => SyntaxKind::NOTIFIES_KW,
            LogosToken::ListensKw => SyntaxKind::LISTENS_KW,
            LogosToken::ActorKw => SyntaxKind::ACTOR_KW,
            LogosToken::ActorsKw => SyntaxKind::ACTORS_KW,
            LogosToken::ExposureKw => SyntaxKind::EXPOSURE_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        tokenize(input)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn lex_use_case_header() {
        assert_eq!(
            kinds(r#"use_case "Checkout" {"#),
            vec![SyntaxKind::USE_CASE_KW, SyntaxKind::STRING, SyntaxKind::L_BRACE]
        );
    }

    #[test]
    fn lex_hyphenated_identifiers() {
        // `data-stores` is a keyword; a longer hyphenated name stays an ident
        assert_eq!(kinds("data-stores"), vec![SyntaxKind::DATA_STORES_KW]);
        assert_eq!(kinds("service-re-go-vas"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("domains_extra"), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn lex_newlines_are_not_trivia() {
        let tokens = tokenize("a\nb");
        assert_eq!(tokens[1].kind, SyntaxKind::NEWLINE);
    }

    #[test]
    fn lex_offsets_are_cumulative() {
        let tokens = tokenize("ab cd");
        assert_eq!(u32::from(tokens[0].offset), 0);
        assert_eq!(u32::from(tokens[2].offset), 3);
    }
}
