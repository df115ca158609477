//! Parser Tests - Domain Groupings, Actors, and Exposures

use craft::parser::{AstNode, Block, DomainDef, SourceFile, parse};
use rstest::rstest;

/// Helper to collect all domain definitions, including those inside a
/// `domains { }` group
fn domain_defs(input: &str) -> Vec<DomainDef> {
    let parsed = parse(input);
    let file = SourceFile::cast(parsed.syntax()).expect("should cast");
    let mut defs = Vec::new();
    for block in file.blocks() {
        match block {
            Block::Domain(def) => defs.push(def),
            Block::Domains(group) => defs.extend(group.domains()),
            _ => {}
        }
    }
    defs
}

#[test]
fn test_single_domain_definition() {
    let dsl = r#"domain ECommerce {
    User
    Product
    Order
    Payment
}"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let defs = domain_defs(dsl);
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name().and_then(|n| n.value()), Some("ECommerce".to_string()));
    assert_eq!(
        defs[0].sub_domains().collect::<Vec<_>>(),
        vec!["User", "Product", "Order", "Payment"]
    );
}

#[test]
fn test_comma_separated_subdomains() {
    let defs = domain_defs("domain Billing { Invoicing, Payments }");
    assert_eq!(
        defs[0].sub_domains().collect::<Vec<_>>(),
        vec!["Invoicing", "Payments"]
    );
}

#[test]
fn test_multiple_domains_block() {
    let dsl = r#"domains {
    ECommerce {
        User
        Product
    }
    Logistics {
        Shipping
    }
}"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let defs = domain_defs(dsl);
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name().and_then(|n| n.value()), Some("ECommerce".to_string()));
    assert_eq!(defs[1].name().and_then(|n| n.value()), Some("Logistics".to_string()));
    assert_eq!(defs[1].sub_domains().collect::<Vec<_>>(), vec!["Shipping"]);
}

#[rstest]
#[case("actor user Customer_Support", "user", "Customer_Support")]
#[case("actor system CronA", "system", "CronA")]
#[case("actor service Database", "service", "Database")]
fn test_standalone_actor(#[case] input: &str, #[case] kind: &str, #[case] name: &str) {
    let parsed = parse(input);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let file = SourceFile::cast(parsed.syntax()).unwrap();
    let actor = file
        .blocks()
        .find_map(|b| match b {
            Block::Actor(a) => Some(a),
            _ => None,
        })
        .expect("should have an actor");
    assert_eq!(actor.kind_text(), Some(kind.to_string()));
    assert_eq!(actor.name().and_then(|n| n.value()), Some(name.to_string()));
}

#[test]
fn test_actors_block() {
    let dsl = r#"actors {
    user Business_User
    system CronA
    service Database
}"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let file = SourceFile::cast(parsed.syntax()).unwrap();
    let actors: Vec<_> = file
        .blocks()
        .filter_map(|b| match b {
            Block::Actors(block) => Some(block.actors().collect::<Vec<_>>()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(actors.len(), 3);
    assert_eq!(actors[1].kind_text(), Some("system".to_string()));
    assert_eq!(actors[1].name().and_then(|n| n.value()), Some("CronA".to_string()));
}

#[test]
fn test_exposure_properties() {
    let dsl = r#"exposure PublicAPI {
    to: external_clients, mobile_apps
    of: UserService, OrderService
    through: APIGateway, LoadBalancer
}"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let file = SourceFile::cast(parsed.syntax()).unwrap();
    let exposure = file
        .blocks()
        .find_map(|b| match b {
            Block::Exposure(e) => Some(e),
            _ => None,
        })
        .expect("should have an exposure");

    assert_eq!(exposure.name().and_then(|n| n.value()), Some("PublicAPI".to_string()));
    let properties: Vec<_> = exposure.properties().collect();
    assert_eq!(properties.len(), 3);
    assert_eq!(properties[0].key(), Some("to".to_string()));
    assert_eq!(properties[0].values(), vec!["external_clients", "mobile_apps"]);
    assert_eq!(properties[2].key(), Some("through".to_string()));
    assert_eq!(properties[2].values(), vec!["APIGateway", "LoadBalancer"]);
}

#[test]
fn test_mixed_file_parses() {
    let dsl = r#"domain Commerce {
    Orders
}

services {
  Checkout {
    domains: Orders
  }
}

use_case "Place Order" {
    when user places order
        Orders validates the cart
}
"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let file = SourceFile::cast(parsed.syntax()).unwrap();
    assert_eq!(file.blocks().count(), 3);
}
