//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Craft syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Source text of this node with all whitespace runs collapsed to a
    /// single space, as used for scenario descriptions.
    fn normalized_text(&self) -> String {
        let text = self.syntax().text().to_string();
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

/// First token of a given kind among a node's direct children
fn token_child(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// All identifier tokens among a node's direct children
fn ident_children(node: &SyntaxNode) -> Vec<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .map(|t| t.text().to_string())
        .collect()
}

/// Strip surrounding double quotes from a string token's text
pub fn unquote(text: &str) -> String {
    if text.starts_with('"') && text.ends_with('"') && text.len() >= 2 {
        text[1..text.len() - 1].to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// Root
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.0.children().filter_map(Block::cast)
    }
}

/// Any top-level block of a Craft file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Block {
    Services(ServicesBlock),
    Domain(DomainDef),
    Domains(DomainsBlock),
    UseCase(UseCase),
    Actor(ActorDef),
    Actors(ActorsBlock),
    Exposure(Exposure),
}

impl AstNode for Block {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::SERVICES_BLOCK
                | SyntaxKind::DOMAIN_DEF
                | SyntaxKind::DOMAINS_BLOCK
                | SyntaxKind::USE_CASE
                | SyntaxKind::ACTOR_DEF
                | SyntaxKind::ACTORS_BLOCK
                | SyntaxKind::EXPOSURE
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SERVICES_BLOCK => Some(Self::Services(ServicesBlock(node))),
            SyntaxKind::DOMAIN_DEF => Some(Self::Domain(DomainDef(node))),
            SyntaxKind::DOMAINS_BLOCK => Some(Self::Domains(DomainsBlock(node))),
            SyntaxKind::USE_CASE => Some(Self::UseCase(UseCase(node))),
            SyntaxKind::ACTOR_DEF => Some(Self::Actor(ActorDef(node))),
            SyntaxKind::ACTORS_BLOCK => Some(Self::Actors(ActorsBlock(node))),
            SyntaxKind::EXPOSURE => Some(Self::Exposure(Exposure(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Services(n) => n.syntax(),
            Self::Domain(n) => n.syntax(),
            Self::Domains(n) => n.syntax(),
            Self::UseCase(n) => n.syntax(),
            Self::Actor(n) => n.syntax(),
            Self::Actors(n) => n.syntax(),
            Self::Exposure(n) => n.syntax(),
        }
    }
}

// ============================================================================
// Names and references
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    /// Raw token text (quotes included for string names)
    pub fn text(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::STRING))
            .map(|t| t.text().to_string())
    }

    /// Name value with surrounding quotes stripped
    pub fn value(&self) -> Option<String> {
        self.text().map(|t| unquote(&t))
    }
}

ast_node!(DomainRef, DOMAIN_REF);

impl DomainRef {
    pub fn text(&self) -> Option<String> {
        token_child(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

// ============================================================================
// Services
// ============================================================================

ast_node!(ServicesBlock, SERVICES_BLOCK);

impl ServicesBlock {
    pub fn services(&self) -> impl Iterator<Item = ServiceDef> + '_ {
        self.0.children().filter_map(ServiceDef::cast)
    }
}

ast_node!(ServiceDef, SERVICE_DEF);

impl ServiceDef {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn domains_property(&self) -> Option<DomainsProperty> {
        self.0.children().find_map(DomainsProperty::cast)
    }

    pub fn data_stores_property(&self) -> Option<DataStoresProperty> {
        self.0.children().find_map(DataStoresProperty::cast)
    }

    pub fn language_property(&self) -> Option<LanguageProperty> {
        self.0.children().find_map(LanguageProperty::cast)
    }

    pub fn parent_domain_property(&self) -> Option<ParentDomainProperty> {
        self.0.children().find_map(ParentDomainProperty::cast)
    }

    /// All property nodes in declaration order (for re-serialization)
    pub fn properties(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children().filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::DOMAINS_PROPERTY
                    | SyntaxKind::DATA_STORES_PROPERTY
                    | SyntaxKind::LANGUAGE_PROPERTY
                    | SyntaxKind::PARENT_DOMAIN_PROPERTY
            )
        })
    }
}

ast_node!(DomainsProperty, DOMAINS_PROPERTY);

impl DomainsProperty {
    pub fn domains(&self) -> impl Iterator<Item = DomainRef> + '_ {
        self.0.children().filter_map(DomainRef::cast)
    }
}

ast_node!(DataStoresProperty, DATA_STORES_PROPERTY);

impl DataStoresProperty {
    pub fn names(&self) -> Vec<String> {
        ident_children(&self.0)
    }
}

ast_node!(LanguageProperty, LANGUAGE_PROPERTY);

impl LanguageProperty {
    /// The identifier following the colon
    pub fn value(&self) -> Option<String> {
        ident_children(&self.0).into_iter().next()
    }
}

ast_node!(ParentDomainProperty, PARENT_DOMAIN_PROPERTY);

impl ParentDomainProperty {
    pub fn value(&self) -> Option<String> {
        ident_children(&self.0).into_iter().next()
    }
}

// ============================================================================
// Domain groupings
// ============================================================================

ast_node!(DomainDef, DOMAIN_DEF);

impl DomainDef {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn sub_domains(&self) -> impl Iterator<Item = String> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::SUBDOMAIN)
            .filter_map(|n| token_child(&n, SyntaxKind::IDENT))
            .map(|t| t.text().to_string())
    }
}

ast_node!(DomainsBlock, DOMAINS_BLOCK);

impl DomainsBlock {
    pub fn domains(&self) -> impl Iterator<Item = DomainDef> + '_ {
        self.0.children().filter_map(DomainDef::cast)
    }
}

// ============================================================================
// Use cases
// ============================================================================

ast_node!(UseCase, USE_CASE);

impl UseCase {
    /// Use case name from the quoted string in the header
    pub fn name(&self) -> Option<String> {
        token_child(&self.0, SyntaxKind::STRING).map(|t| unquote(t.text()))
    }

    pub fn scenarios(&self) -> impl Iterator<Item = Scenario> + '_ {
        self.0.children().filter_map(Scenario::cast)
    }
}

ast_node!(Scenario, SCENARIO);

impl Scenario {
    pub fn trigger(&self) -> Option<Trigger> {
        self.0.children().find_map(Trigger::cast)
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.children().filter_map(Action::cast)
    }
}

ast_node!(Trigger, TRIGGER);

impl Trigger {
    /// The listening domain for `when <domain> listens "<event>"` triggers
    pub fn domain(&self) -> Option<DomainRef> {
        self.0.children().find_map(DomainRef::cast)
    }

    /// The quoted event for event and listener triggers
    pub fn event(&self) -> Option<String> {
        token_child(&self.0, SyntaxKind::STRING).map(|t| unquote(t.text()))
    }
}

/// One action line of a scenario
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Sync(SyncAction),
    Async(AsyncAction),
    Internal(InternalAction),
}

impl AstNode for Action {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::SYNC_ACTION | SyntaxKind::ASYNC_ACTION | SyntaxKind::INTERNAL_ACTION
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SYNC_ACTION => Some(Self::Sync(SyncAction(node))),
            SyntaxKind::ASYNC_ACTION => Some(Self::Async(AsyncAction(node))),
            SyntaxKind::INTERNAL_ACTION => Some(Self::Internal(InternalAction(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Sync(n) => n.syntax(),
            Self::Async(n) => n.syntax(),
            Self::Internal(n) => n.syntax(),
        }
    }
}

impl Action {
    /// Domain references of this action in source order
    pub fn domains(&self) -> Vec<DomainRef> {
        self.syntax()
            .children()
            .filter_map(DomainRef::cast)
            .collect()
    }
}

ast_node!(SyncAction, SYNC_ACTION);

impl SyncAction {
    /// Source domain (before `asks`)
    pub fn source(&self) -> Option<DomainRef> {
        self.0.children().find_map(DomainRef::cast)
    }

    /// Target domain (after `asks`)
    pub fn target(&self) -> Option<DomainRef> {
        self.0.children().filter_map(DomainRef::cast).nth(1)
    }
}

ast_node!(AsyncAction, ASYNC_ACTION);

impl AsyncAction {
    pub fn domain(&self) -> Option<DomainRef> {
        self.0.children().find_map(DomainRef::cast)
    }

    pub fn event(&self) -> Option<String> {
        token_child(&self.0, SyntaxKind::STRING).map(|t| unquote(t.text()))
    }
}

ast_node!(InternalAction, INTERNAL_ACTION);

impl InternalAction {
    pub fn domain(&self) -> Option<DomainRef> {
        self.0.children().find_map(DomainRef::cast)
    }
}

// ============================================================================
// Actors and exposures
// ============================================================================

ast_node!(ActorDef, ACTOR_DEF);

impl ActorDef {
    /// The actor kind word: user, system, or service
    pub fn kind_text(&self) -> Option<String> {
        token_child(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }
}

ast_node!(ActorsBlock, ACTORS_BLOCK);

impl ActorsBlock {
    pub fn actors(&self) -> impl Iterator<Item = ActorDef> + '_ {
        self.0.children().filter_map(ActorDef::cast)
    }
}

ast_node!(Exposure, EXPOSURE);

impl Exposure {
    pub fn name(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn properties(&self) -> impl Iterator<Item = ExposureProperty> + '_ {
        self.0.children().filter_map(ExposureProperty::cast)
    }
}

ast_node!(ExposureProperty, EXPOSURE_PROPERTY);

impl ExposureProperty {
    /// Property key: to, of, or through
    pub fn key(&self) -> Option<String> {
        ident_children(&self.0).into_iter().next()
    }

    /// Property values (the identifiers after the colon)
    pub fn values(&self) -> Vec<String> {
        ident_children(&self.0).into_iter().skip(1).collect()
    }
}
