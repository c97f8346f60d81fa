//! Integration tests for the cached public site content.

#![allow(clippy::unwrap_used)]

use folio_backoffice::content::{Section, placeholder_contact, placeholder_hero};
use folio_core::{ContactInfo, SkillCategory, SkillItem};
use folio_integration_tests::{TestContext, fields};
use serde_json::json;

#[tokio::test]
async fn test_empty_site_renders_placeholders() {
    let ctx = TestContext::new();
    let content = ctx.backoffice.site().load().await;

    assert_eq!(content.hero, placeholder_hero());
    assert_eq!(content.contact, placeholder_contact());
    assert!(content.portfolio.is_empty());
    assert!(content.career.is_empty());
    assert!(content.skills.is_empty());
    assert_eq!(content.placeholders, vec![Section::Hero, Section::Contact]);
}

#[tokio::test]
async fn test_unavailable_store_degrades_to_placeholders() {
    let ctx = TestContext::new();
    ctx.transport
        .seed("Hero", fields(json!({"Title": "Jane", "Subtitle": "Engineer"})));
    for table in ["Hero", "Contact", "Portfolio", "Career", "Skills"] {
        ctx.transport.set_unavailable(table, true);
    }

    let content = ctx.backoffice.site().load().await;
    assert_eq!(content.hero, placeholder_hero());
    assert!(content.skills.is_empty());
}

#[tokio::test]
async fn test_backoffice_writes_refresh_site() {
    let ctx = TestContext::new();
    let site = ctx.backoffice.site();

    let before = site.load().await;
    assert!(before.skills.is_empty());

    ctx.backoffice
        .skills()
        .save(&SkillItem::new("Rust", SkillCategory::Software))
        .await
        .unwrap();
    ctx.backoffice
        .contact()
        .save(&ContactInfo {
            email: "jane@example.com".to_string(),
            ..ContactInfo::default()
        })
        .await
        .unwrap();

    let after = site.load().await;
    assert_eq!(after.skills.len(), 1);
    assert_eq!(after.contact.email, "jane@example.com");
    assert_eq!(after.placeholders, vec![Section::Hero]);
}

#[tokio::test]
async fn test_out_of_band_changes_wait_for_cache() {
    let ctx = TestContext::new();
    let site = ctx.backoffice.site();
    site.load().await;

    // Written directly to the store, not through a service
    ctx.transport.seed("Skills", fields(json!({"Name": "Go"})));
    assert!(site.load().await.skills.is_empty());

    site.invalidate();
    assert_eq!(site.load().await.skills.len(), 1);
}
