use base64::Engine as _;
use serde_json::{Value, json};

use super::*;
use crate::service::catalog::StyleSpec;

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn endpoint_joins_base_and_model() {
    let cfg = GeminiConfig {
        api_base: "https://example.test/v1beta/".to_string(),
        model: "gemini-2.5-flash-image".to_string(),
        ..GeminiConfig::default()
    };
    assert_eq!(
        cfg.endpoint(),
        "https://example.test/v1beta/models/gemini-2.5-flash-image:generateContent"
    );

    let prefixed = GeminiConfig {
        model: "models/custom".to_string(),
        ..cfg
    };
    assert_eq!(
        prefixed.endpoint(),
        "https://example.test/v1beta/models/custom:generateContent"
    );
}

#[test]
fn defaults_point_at_public_api() {
    let cfg = GeminiConfig::default();
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert_eq!(cfg.model, DEFAULT_MODEL);
    assert_eq!(cfg.timeout, Duration::from_secs(90));
    assert!(cfg.api_key.is_none());
}

#[test]
fn payload_carries_portrait_prompt_and_image_modality() {
    let portrait = EncodedImage::from_bytes("image/jpeg", vec![1, 2, 3]);
    let style = StyleSpec::new("LinkedIn", "Professional headshot.");
    let request = RestyleRequest {
        portrait: &portrait,
        style: &style,
        variation: 2,
    };

    let value: Value = serde_json::to_value(build_payload(&request)).unwrap();
    let parts = &value["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/jpeg"));
    assert_eq!(parts[0]["inlineData"]["data"], json!("AQID"));
    assert!(parts[0].get("text").is_none());
    assert_eq!(parts[1]["text"], json!(request.prompt()));
    assert_eq!(
        value["generationConfig"]["responseModalities"],
        json!(["IMAGE"])
    );
}

#[test]
fn response_yields_first_inline_image() {
    let body = json!({
        "candidates": [{
            "content": { "parts": [
                { "text": "here you go" },
                { "inlineData": { "mimeType": "image/png", "data": BASE64.encode([9u8, 8, 7]) } },
                { "inlineData": { "mimeType": "image/png", "data": BASE64.encode([1u8]) } }
            ]}
        }]
    })
    .to_string();

    let img = parse_response(&body).unwrap();
    assert_eq!(img.mime(), "image/png");
    assert_eq!(img.bytes(), &[9, 8, 7]);
}

#[test]
fn snake_case_fields_and_missing_mime_are_accepted() {
    let mut png = PNG_MAGIC.to_vec();
    png.extend_from_slice(&[0; 16]);
    let body = json!({
        "candidates": [
            { "finishReason": "SAFETY" },
            { "content": { "parts": [ { "inline_data": { "data": BASE64.encode(&png) } } ] } }
        ]
    })
    .to_string();

    let img = parse_response(&body).unwrap();
    assert_eq!(img.mime(), "image/png");
    assert_eq!(img.len(), png.len());
}

#[test]
fn response_without_image_is_a_service_error() {
    for body in [
        json!({ "candidates": [] }).to_string(),
        json!({ "candidates": [ { "content": { "parts": [ { "text": "sorry" } ] } } ] }).to_string(),
        "not json".to_string(),
    ] {
        assert!(matches!(parse_response(&body), Err(AlbumError::Service(_))));
    }
}

#[test]
fn bad_base64_is_a_service_error() {
    let body = json!({
        "candidates": [ { "content": { "parts": [
            { "inlineData": { "mimeType": "image/png", "data": "***" } }
        ] } } ]
    })
    .to_string();
    assert!(matches!(parse_response(&body), Err(AlbumError::Service(_))));
}

#[test]
fn missing_api_key_fails_without_network() {
    let service = GeminiStyleService::new(GeminiConfig {
        api_base: "http://127.0.0.1:9".to_string(),
        ..GeminiConfig::default()
    })
    .unwrap();
    let portrait = EncodedImage::from_bytes("image/png", vec![0]);
    let style = StyleSpec::new("X", "Bold.");
    let err = service
        .restyle(&RestyleRequest {
            portrait: &portrait,
            style: &style,
            variation: 1,
        })
        .unwrap_err();
    assert!(matches!(err, AlbumError::Service(_)));
    assert!(err.to_string().contains("GEMINI_API_KEY"));
}

#[test]
fn empty_model_is_rejected() {
    let cfg = GeminiConfig {
        model: "  ".to_string(),
        ..GeminiConfig::default()
    };
    assert!(GeminiStyleService::new(cfg).is_err());
}

#[test]
fn api_key_travels_in_a_sensitive_header() {
    let service = GeminiStyleService::new(GeminiConfig {
        api_base: "https://example.test/v1beta".to_string(),
        api_key: Some("SECRET-KEY-123".to_string()),
        ..GeminiConfig::default()
    })
    .unwrap();
    let portrait = EncodedImage::from_bytes("image/png", vec![0]);
    let style = StyleSpec::new("X", "Bold.");
    let payload = build_payload(&RestyleRequest {
        portrait: &portrait,
        style: &style,
        variation: 1,
    });

    let req = service
        .request("SECRET-KEY-123", &payload)
        .unwrap()
        .build()
        .unwrap();
    assert!(req.url().query().is_none());
    assert!(!req.url().as_str().contains("SECRET-KEY-123"));
    let key = req.headers().get(API_KEY_HEADER).unwrap();
    assert_eq!(key.to_str().unwrap(), "SECRET-KEY-123");
    assert!(key.is_sensitive());
}

#[test]
fn transport_errors_never_carry_the_api_key() {
    let key = "SECRET-KEY-123";
    let service = GeminiStyleService::new(GeminiConfig {
        api_base: "http://127.0.0.1:1/v1beta".to_string(),
        api_key: Some(key.to_string()),
        timeout: Duration::from_secs(5),
        ..GeminiConfig::default()
    })
    .unwrap();
    let portrait = EncodedImage::from_bytes("image/png", vec![0]);
    let style = StyleSpec::new("X", "Bold.");
    let err = service
        .restyle(&RestyleRequest {
            portrait: &portrait,
            style: &style,
            variation: 1,
        })
        .unwrap_err();

    assert!(matches!(err, AlbumError::Service(_)));
    let msg = err.to_string();
    assert!(!msg.contains(key), "{msg}");
}

#[test]
fn debug_output_redacts_the_api_key() {
    let cfg = GeminiConfig {
        api_key: Some("SECRET-KEY-123".to_string()),
        ..GeminiConfig::default()
    };
    let shown = format!("{cfg:?}");
    assert!(!shown.contains("SECRET-KEY-123"));
    assert!(shown.contains("api_key"));
}
