//! Parser Tests - Services
//!
//! Tests for service definitions and their properties.

use craft::parser::{AstNode, Block, ServiceDef, SourceFile, parse};
use rstest::rstest;

/// Helper to collect all service definitions from parsed content
fn services(input: &str) -> Vec<ServiceDef> {
    let parsed = parse(input);
    let file = SourceFile::cast(parsed.syntax()).expect("should cast");
    file.blocks()
        .filter_map(|b| match b {
            Block::Services(block) => Some(block.services().collect::<Vec<_>>()),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn test_simple_service_parsing() {
    let dsl = r#"services {
  TestService {
    domains: TestDomain
  }
}"#;

    let parsed = parse(dsl);
    assert!(parsed.ok(), "unexpected errors: {:?}", parsed.errors);

    let all = services(dsl);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name().and_then(|n| n.value()), Some("TestService".to_string()));

    let domains: Vec<_> = all[0]
        .domains_property()
        .expect("should have domains")
        .domains()
        .filter_map(|d| d.text())
        .collect();
    assert_eq!(domains, vec!["TestDomain"]);
}

#[test]
fn test_service_name_formats() {
    let dsl = r#"services {
  WalletService {
    domains: Wallet, WalletItemPurchase
    data-stores: wallet_db
  }
  "Order Service" {
    domains: OrderManagement
    data-stores: order_db
  }
  service-re-go-vas {
    domains: Vas
  }
}"#;

    let all = services(dsl);
    let names: Vec<_> = all
        .iter()
        .filter_map(|s| s.name().and_then(|n| n.value()))
        .collect();
    assert_eq!(names, vec!["WalletService", "Order Service", "service-re-go-vas"]);
}

#[test]
fn test_service_properties() {
    let dsl = r#"services {
  Checkout {
    domains: Orders, Payments
    data-stores: orders_db, payments_db
    language: golang
    parent-domain: Commerce
  }
}"#;

    let all = services(dsl);
    let service = &all[0];

    let domains: Vec<_> = service
        .domains_property()
        .unwrap()
        .domains()
        .filter_map(|d| d.text())
        .collect();
    assert_eq!(domains, vec!["Orders", "Payments"]);

    assert_eq!(
        service.data_stores_property().unwrap().names(),
        vec!["orders_db", "payments_db"]
    );
    assert_eq!(
        service.language_property().and_then(|p| p.value()),
        Some("golang".to_string())
    );
    assert_eq!(
        service.parent_domain_property().and_then(|p| p.value()),
        Some("Commerce".to_string())
    );
}

#[rstest]
#[case("services {\n}", 0)]
#[case("services {\n  A {\n    domains: X\n  }\n}", 1)]
#[case("services {\n  A {\n    domains: X\n  }\n  B {\n    domains: Y\n  }\n}", 2)]
fn test_service_count(#[case] input: &str, #[case] expected: usize) {
    assert_eq!(services(input).len(), expected);
}

#[test]
fn test_unknown_property_recovers() {
    let dsl = r#"services {
  A {
    domains: X
    replicas: 3
  }
}"#;

    let parsed = parse(dsl);
    assert!(!parsed.ok());
    // The service and its known property survive error recovery
    let all = services(dsl);
    assert_eq!(all.len(), 1);
    assert!(all[0].domains_property().is_some());
}
