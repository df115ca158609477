//! Recursive descent parser for the Craft DSL
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{GreenNode, GreenNodeBuilder};
use text_size::{TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Craft source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Kind of the nth non-trivia token from the current position.
    /// Newlines count as real tokens here.
    fn nth(&self, n: usize) -> SyntaxKind {
        let mut idx = self.pos;
        let mut count = 0;
        while idx < self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return self.tokens[idx].kind;
                }
                count += 1;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    /// Kind of the next token that is neither trivia nor a newline,
    /// without consuming anything.
    fn peek_past_blank(&self) -> SyntaxKind {
        let mut idx = self.pos;
        while idx < self.tokens.len() {
            let kind = self.tokens[idx].kind;
            if !kind.is_trivia() && kind != SyntaxKind::NEWLINE {
                return kind;
            }
            idx += 1;
        }
        SyntaxKind::ERROR
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) {
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump_any(&mut self) {
        self.bump();
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    /// Skip whitespace and comments (but not newlines)
    fn skip_ws(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            self.bump();
        }
    }

    /// Skip whitespace, comments, and newlines
    fn skip_blank(&mut self) {
        while self
            .current()
            .map(|t| t.kind.is_trivia() || t.kind == SyntaxKind::NEWLINE)
            .unwrap_or(false)
        {
            self.bump();
        }
    }

    /// Consume the remainder of the current line (phrase words, connectors,
    /// quoted strings), stopping before the newline or a closing brace.
    fn bump_line_rest(&mut self) {
        while !self.at_eof() && !self.at(SyntaxKind::NEWLINE) && !self.at(SyntaxKind::R_BRACE) {
            self.bump_any();
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump_any();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump_any();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// NAME = IDENT | STRING
    fn parse_name(&mut self) {
        self.start_node(SyntaxKind::NAME);
        if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::STRING) {
            self.bump();
        } else {
            self.error("expected name");
        }
        self.finish_node();
    }

    /// DOMAIN_REF = IDENT
    fn parse_domain_ref(&mut self) {
        self.start_node(SyntaxKind::DOMAIN_REF);
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected domain name");
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// SourceFile = (ServicesBlock | DomainDef | DomainsBlock | UseCase
    ///              | ActorDef | ActorsBlock | Exposure)*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at_eof() {
                break;
            }

            match self.current_kind() {
                SyntaxKind::SERVICES_KW => self.parse_services_block(),
                SyntaxKind::DOMAIN_KW => self.parse_domain_def(true),
                SyntaxKind::DOMAINS_KW => self.parse_domains_block(),
                SyntaxKind::USE_CASE_KW => self.parse_use_case(),
                SyntaxKind::ACTOR_KW => self.parse_actor_def(true),
                SyntaxKind::ACTORS_KW => self.parse_actors_block(),
                SyntaxKind::EXPOSURE_KW => self.parse_exposure(),
                _ => {
                    self.error_recover(
                        format!("unexpected token: {:?}", self.current_kind()),
                        &[
                            SyntaxKind::SERVICES_KW,
                            SyntaxKind::DOMAIN_KW,
                            SyntaxKind::DOMAINS_KW,
                            SyntaxKind::USE_CASE_KW,
                            SyntaxKind::ACTOR_KW,
                            SyntaxKind::ACTORS_KW,
                            SyntaxKind::EXPOSURE_KW,
                        ],
                    );
                }
            }

            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("stuck on token: {:?}", self.current_kind()));
                self.bump_any();
            }
        }

        self.finish_node();
    }

    /// ServicesBlock = 'services' '{' ServiceDef* '}'
    fn parse_services_block(&mut self) {
        self.start_node(SyntaxKind::SERVICES_BLOCK);

        self.expect(SyntaxKind::SERVICES_KW);
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::STRING) {
                self.parse_service_def();
            } else {
                self.error_recover(
                    "expected service definition",
                    &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                );
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// ServiceDef = Name '{' ServiceProperty* '}'
    fn parse_service_def(&mut self) {
        self.start_node(SyntaxKind::SERVICE_DEF);

        self.parse_name();
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            match self.current_kind() {
                SyntaxKind::DOMAINS_KW => {
                    self.parse_list_property(SyntaxKind::DOMAINS_PROPERTY, true)
                }
                SyntaxKind::DATA_STORES_KW => {
                    self.parse_list_property(SyntaxKind::DATA_STORES_PROPERTY, false)
                }
                SyntaxKind::LANGUAGE_KW => {
                    self.parse_value_property(SyntaxKind::LANGUAGE_PROPERTY)
                }
                SyntaxKind::PARENT_DOMAIN_KW => {
                    self.parse_value_property(SyntaxKind::PARENT_DOMAIN_PROPERTY)
                }
                _ => {
                    self.error_recover(
                        format!("expected service property, found {:?}", self.current_kind()),
                        &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                    );
                }
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// ListProperty = kw ':' Item (',' Item)*
    ///
    /// Items are wrapped in DOMAIN_REF nodes when `as_domains` is set
    /// (the `domains:` property), and left as bare identifiers otherwise.
    fn parse_list_property(&mut self, node: SyntaxKind, as_domains: bool) {
        self.start_node(node);

        self.bump(); // property keyword
        self.skip_ws();
        self.expect(SyntaxKind::COLON);

        loop {
            self.skip_ws();
            if self.at(SyntaxKind::IDENT) {
                if as_domains {
                    self.parse_domain_ref();
                } else {
                    self.bump();
                }
            } else {
                break;
            }
            self.skip_ws();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }

        self.finish_node();
    }

    /// ValueProperty = kw ':' IDENT
    fn parse_value_property(&mut self, node: SyntaxKind) {
        self.start_node(node);

        self.bump(); // property keyword
        self.skip_ws();
        self.expect(SyntaxKind::COLON);
        self.skip_ws();
        if self.at(SyntaxKind::IDENT) {
            self.bump();
        } else {
            self.error("expected property value");
        }

        self.finish_node();
    }

    /// DomainDef = 'domain'? Name '{' Subdomain* '}'
    ///
    /// The keyword is absent for the inner blocks of a `domains { }` group.
    fn parse_domain_def(&mut self, with_keyword: bool) {
        self.start_node(SyntaxKind::DOMAIN_DEF);

        if with_keyword {
            self.expect(SyntaxKind::DOMAIN_KW);
            self.skip_ws();
        }
        self.parse_name();
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::IDENT) {
                self.start_node(SyntaxKind::SUBDOMAIN);
                self.bump();
                self.finish_node();
                self.skip_ws();
                self.eat(SyntaxKind::COMMA);
            } else {
                self.error_recover(
                    "expected subdomain name",
                    &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                );
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// DomainsBlock = 'domains' '{' (Name '{' Subdomain* '}')* '}'
    fn parse_domains_block(&mut self) {
        self.start_node(SyntaxKind::DOMAINS_BLOCK);

        self.expect(SyntaxKind::DOMAINS_KW);
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::IDENT) {
                self.parse_domain_def(false);
            } else {
                self.error_recover("expected domain block", &[SyntaxKind::R_BRACE]);
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// UseCase = 'use_case' STRING '{' Scenario* '}'
    fn parse_use_case(&mut self) {
        self.start_node(SyntaxKind::USE_CASE);

        self.expect(SyntaxKind::USE_CASE_KW);
        self.skip_ws();
        if self.at(SyntaxKind::STRING) {
            self.bump();
        } else {
            self.error("expected use case name");
        }
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::WHEN_KW) {
                self.parse_scenario();
            } else {
                self.error_recover(
                    "expected scenario (scenarios start with 'when')",
                    &[SyntaxKind::WHEN_KW, SyntaxKind::R_BRACE],
                );
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Scenario = Trigger Action*
    fn parse_scenario(&mut self) {
        self.start_node(SyntaxKind::SCENARIO);

        self.parse_trigger();

        // Action lines follow until the next 'when' or the closing brace.
        // Lookahead first so trailing blanks stay outside this node.
        while self.peek_past_blank() == SyntaxKind::IDENT {
            self.skip_blank();
            self.parse_action();
        }

        self.finish_node();
    }

    /// Trigger = 'when' (DomainRef 'listens' STRING | STRING | IDENT IDENT phrase)
    fn parse_trigger(&mut self) {
        self.start_node(SyntaxKind::TRIGGER);

        self.expect(SyntaxKind::WHEN_KW);
        self.skip_ws();

        if self.at(SyntaxKind::STRING) {
            // Event trigger: when "payment_completed"
            self.bump();
        } else if self.at(SyntaxKind::IDENT) {
            if self.nth(1) == SyntaxKind::LISTENS_KW {
                // Domain listener: when orders listens "order_placed"
                self.parse_domain_ref();
                self.skip_ws();
                self.bump(); // listens
                self.skip_ws();
                if self.at(SyntaxKind::STRING) {
                    self.bump();
                } else {
                    self.error("expected event name");
                }
            } else {
                // External trigger: when user creates account
                self.bump(); // actor
                self.bump_line_rest();
            }
        } else {
            self.error_recover("expected trigger", &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE]);
        }

        self.finish_node();
    }

    /// Action = SyncAction | AsyncAction | InternalAction
    ///
    /// The second token of the line decides the kind: `asks` makes a sync
    /// action, `notifies` an async action, anything else an internal action.
    fn parse_action(&mut self) {
        match self.nth(1) {
            SyntaxKind::ASKS_KW => {
                self.start_node(SyntaxKind::SYNC_ACTION);
                self.parse_domain_ref();
                self.skip_ws();
                self.bump(); // asks
                self.skip_ws();
                if self.at(SyntaxKind::IDENT) {
                    self.parse_domain_ref();
                } else {
                    self.error("expected target domain");
                }
                self.bump_line_rest();
                self.finish_node();
            }
            SyntaxKind::NOTIFIES_KW => {
                self.start_node(SyntaxKind::ASYNC_ACTION);
                self.parse_domain_ref();
                self.skip_ws();
                self.bump(); // notifies
                self.skip_ws();
                if self.at(SyntaxKind::STRING) {
                    self.bump();
                } else {
                    self.error("expected event name");
                }
                self.bump_line_rest();
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::INTERNAL_ACTION);
                self.parse_domain_ref();
                self.bump_line_rest();
                self.finish_node();
            }
        }
    }

    /// ActorDef = 'actor'? actor_kind Name
    ///
    /// The keyword is absent for entries inside an `actors { }` block.
    /// Actor kinds (user/system/service) are contextual identifiers.
    fn parse_actor_def(&mut self, with_keyword: bool) {
        self.start_node(SyntaxKind::ACTOR_DEF);

        if with_keyword {
            self.expect(SyntaxKind::ACTOR_KW);
            self.skip_ws();
        }
        if self.at(SyntaxKind::IDENT) {
            self.bump(); // kind word
        } else {
            self.error("expected actor kind");
        }
        self.skip_ws();
        if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::STRING) {
            self.parse_name();
        } else {
            self.error("expected actor name");
        }

        self.finish_node();
    }

    /// ActorsBlock = 'actors' '{' (actor_kind Name)* '}'
    fn parse_actors_block(&mut self) {
        self.start_node(SyntaxKind::ACTORS_BLOCK);

        self.expect(SyntaxKind::ACTORS_KW);
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::IDENT) {
                self.parse_actor_def(false);
            } else {
                self.error_recover(
                    "expected actor definition",
                    &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                );
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// Exposure = 'exposure' Name '{' ExposureProperty* '}'
    fn parse_exposure(&mut self) {
        self.start_node(SyntaxKind::EXPOSURE);

        self.expect(SyntaxKind::EXPOSURE_KW);
        self.skip_ws();
        if self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::STRING) {
            self.parse_name();
        } else {
            self.error("expected exposure name");
        }
        self.skip_ws();
        self.expect(SyntaxKind::L_BRACE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.skip_blank();
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break;
            }
            if self.at(SyntaxKind::IDENT) {
                self.parse_exposure_property();
            } else {
                self.error_recover(
                    "expected exposure property",
                    &[SyntaxKind::NEWLINE, SyntaxKind::R_BRACE],
                );
            }
            if self.pos == pos_before && !self.at_eof() {
                self.bump_any();
            }
        }

        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// ExposureProperty = ('to' | 'of' | 'through') ':' IDENT (',' IDENT)*
    ///
    /// Property keys are contextual identifiers.
    fn parse_exposure_property(&mut self) {
        self.start_node(SyntaxKind::EXPOSURE_PROPERTY);

        self.bump(); // key
        self.skip_ws();
        self.expect(SyntaxKind::COLON);

        loop {
            self.skip_ws();
            if self.at(SyntaxKind::IDENT) {
                self.bump();
            } else {
                break;
            }
            self.skip_ws();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }

        self.finish_node();
    }
}
