use super::*;

#[test]
fn default_catalog_fills_the_reference_grid() {
    let catalog = StyleCatalog::default();
    catalog.validate().unwrap();
    assert_eq!(catalog.slot_count(), 8);
    let keys: Vec<_> = catalog.slot_ids().iter().map(SlotId::key).collect();
    assert_eq!(&keys[..3], &["LinkedIn_1", "LinkedIn_2", "Instagram_1"]);
}

#[test]
fn variation_prompts_differ() {
    let spec = StyleSpec::new("LinkedIn", "Professional headshot.");
    let v1 = spec.prompt_for(1);
    let v2 = spec.prompt_for(2);
    assert!(v1.starts_with(PROMPT_PREAMBLE));
    assert!(v1.ends_with("Professional headshot."));
    assert_ne!(v1, v2);
    assert!(v2.contains("alternative version 2"));
}

#[test]
fn json_catalog_defaults_variations() {
    let catalog = StyleCatalog::from_json(
        r#"{ "styles": [ { "name": "Tinder", "prompt": "Fun and flirty." } ] }"#,
    )
    .unwrap();
    assert_eq!(catalog.variations, 2);
    assert_eq!(catalog.get("Tinder").unwrap().prompt, "Fun and flirty.");
    assert!(catalog.get("LinkedIn").is_none());
}

#[test]
fn invalid_catalogs_are_rejected() {
    assert!(StyleCatalog::from_json(r#"{ "styles": [] }"#).is_err());
    assert!(
        StyleCatalog::from_json(
            r#"{ "styles": [ { "name": "A", "prompt": "p" }, { "name": "A", "prompt": "q" } ] }"#
        )
        .is_err()
    );
    assert!(
        StyleCatalog::from_json(r#"{ "styles": [ { "name": "a/b", "prompt": "p" } ] }"#)
            .is_err()
    );
    assert!(
        StyleCatalog::from_json(r#"{ "styles": [ { "name": "A", "prompt": " " } ] }"#).is_err()
    );
    assert!(matches!(
        StyleCatalog::from_json(r#"{ "styles": [], "extra": 1 }"#),
        Err(AlbumError::Serde(_))
    ));
}
