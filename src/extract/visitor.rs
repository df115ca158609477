//! Single-file tree traversal.
//!
//! One depth-first, left-to-right pass over the syntax tree per file. Entry
//! points are first-seen-wins: the first domain a scenario step mentions
//! becomes the use case's entry point, strictly in traversal order.

use indexmap::IndexSet;

use crate::model::{
    Actor, ActorKind, DomainDefinition, ExposureInfo, ExtractionResult, ServiceDefinition,
    UseCaseInfo,
};
use crate::parser::{
    Action, ActorDef, AstNode, Block, DomainDef, Exposure, ServicesBlock, SourceFile, UseCase,
};
use crate::syntax::{SyntaxFile, parse_text};

use super::ExtractError;
use super::context::ExtractionContext;

/// Extract the domain model from one file's source text.
///
/// A file that fails to parse yields an empty result (not an error); a
/// traversal fault yields an empty result with `error` set. Either way this
/// never panics across the boundary.
pub fn extract_from_text(content: &str, uri: &str) -> ExtractionResult {
    let report = parse_text(content);
    if !report.success {
        tracing::debug!(uri, errors = report.errors.len(), "parse failed, returning empty result");
        return ExtractionResult::default();
    }
    match report.file {
        Some(file) => extract_from_file(&file, uri),
        None => ExtractionResult::default(),
    }
}

/// Extract from an already-parsed syntax file.
pub fn extract_from_file(file: &SyntaxFile, uri: &str) -> ExtractionResult {
    let source = file.source_text();
    let mut ctx = ExtractionContext::new(uri, &source);

    match visit_file(&mut ctx, file) {
        Ok(()) => ctx.into_result(),
        Err(e) => {
            tracing::debug!(uri, error = %e, "traversal fault");
            ExtractionResult::failed(e.to_string())
        }
    }
}

fn visit_file(ctx: &mut ExtractionContext, file: &SyntaxFile) -> Result<(), ExtractError> {
    let source_file: SourceFile = file.source_file().ok_or(ExtractError::MalformedTree)?;

    for block in source_file.blocks() {
        match block {
            Block::Services(services) => visit_services(ctx, &services),
            Block::Domain(def) => visit_domain_def(ctx, &def),
            Block::Domains(group) => {
                for def in group.domains() {
                    visit_domain_def(ctx, &def);
                }
            }
            Block::UseCase(use_case) => visit_use_case(ctx, &use_case),
            Block::Actor(actor) => visit_actor(ctx, &actor),
            Block::Actors(group) => {
                for actor in group.actors() {
                    visit_actor(ctx, &actor);
                }
            }
            Block::Exposure(exposure) => visit_exposure(ctx, &exposure),
        }
    }

    Ok(())
}

fn visit_use_case(ctx: &mut ExtractionContext, use_case: &UseCase) {
    let name = use_case
        .name()
        .unwrap_or_else(|| "Unknown Use Case".to_string());
    let block_range = ctx.block_range(use_case.syntax().text_range());

    // Ordered set of domains seen in this use case, in traversal order
    let mut seen = IndexSet::new();
    let mut scenarios = Vec::new();

    for scenario in use_case.scenarios() {
        if let Some(trigger) = scenario.trigger() {
            if let Some(domain) = trigger.domain().and_then(|d| d.text()) {
                ctx.domains.insert(domain.clone());
                seen.insert(domain);
            }
        }

        for action in scenario.actions() {
            let text = action.normalized_text();
            let label = match action {
                Action::Sync(_) => "Sync",
                Action::Async(_) => "Async",
                Action::Internal(_) => "Internal",
            };
            scenarios.push(format!("{label}: {text}"));

            for domain_ref in action.domains() {
                if let Some(domain) = domain_ref.text() {
                    ctx.domains.insert(domain.clone());
                    seen.insert(domain);
                }
            }
        }
    }

    // First domain encountered becomes the entry point
    let entry_point_sub_domain = seen.first().cloned();
    let all_domains: Vec<String> = seen.into_iter().collect();

    ctx.use_cases.push(UseCaseInfo {
        name,
        entry_point_sub_domain,
        all_domains,
        scenarios,
        block_range,
    });
}

fn visit_services(ctx: &mut ExtractionContext, services: &ServicesBlock) {
    for service in services.services() {
        let name = service
            .name()
            .and_then(|n| n.value())
            .unwrap_or_default();
        let block_range = ctx.block_range(service.syntax().text_range());

        let mut domains = Vec::new();
        if let Some(property) = service.domains_property() {
            for domain_ref in property.domains() {
                if let Some(domain) = domain_ref.text() {
                    ctx.domains.insert(domain.clone());
                    domains.push(domain);
                }
            }
        }

        let data_stores = service
            .data_stores_property()
            .map(|p| p.names())
            .unwrap_or_default();
        let language = service.language_property().and_then(|p| p.value());
        let parent_domain = service.parent_domain_property().and_then(|p| p.value());

        ctx.service_definitions.push(ServiceDefinition {
            name,
            domains,
            data_stores,
            language,
            parent_domain,
            block_range,
        });
    }
}

fn visit_domain_def(ctx: &mut ExtractionContext, def: &DomainDef) {
    let Some(name) = def.name().and_then(|n| n.value()) else {
        return;
    };
    let block_range = ctx.block_range(def.syntax().text_range());

    // Deduplicate while keeping declaration order. The domain's own name and
    // its subdomains do not enter the global subdomain set; only references
    // in scenarios and service domain lists do.
    let sub_domains: Vec<String> = def.sub_domains().collect::<IndexSet<_>>().into_iter().collect();

    ctx.domain_definitions.push(DomainDefinition {
        name,
        sub_domains,
        block_range,
    });
}

fn visit_actor(ctx: &mut ExtractionContext, actor: &ActorDef) {
    let Some(kind) = actor.kind_text().and_then(|k| ActorKind::from_keyword(&k)) else {
        tracing::trace!("skipping actor with unknown kind");
        return;
    };
    let Some(name) = actor.name().and_then(|n| n.value()) else {
        return;
    };
    ctx.actors.push(Actor { name, kind });
}

fn visit_exposure(ctx: &mut ExtractionContext, exposure: &Exposure) {
    let Some(name) = exposure.name().and_then(|n| n.value()) else {
        return;
    };
    let block_range = ctx.block_range(exposure.syntax().text_range());

    let mut info = ExposureInfo {
        name,
        to: Vec::new(),
        of: Vec::new(),
        through: Vec::new(),
        block_range,
    };

    for property in exposure.properties() {
        match property.key().as_deref() {
            Some("to") => info.to.extend(property.values()),
            Some("of") => info.of.extend(property.values()),
            Some("through") => info.through.extend(property.values()),
            _ => {}
        }
    }

    ctx.exposures.push(info);
}
