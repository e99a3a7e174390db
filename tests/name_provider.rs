// OneHand Name Provider Tests
// Copyright (c) 2026 Xing_The_Creator | OneHand

use std::sync::Arc;

use onehand_core::names::cache::NameCache;
use onehand_core::names::gemini::GeminiClient;
use onehand_core::names::public_apis::PublicApiUrls;
use onehand_core::names::{AnalysisSource, NameDetails, NameMeaningProvider};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_urls(server: &MockServer) -> PublicApiUrls {
    PublicApiUrls {
        age: format!("{}/agify", server.uri()),
        origin: format!("{}/nationalize", server.uri()),
        gender: format!("{}/genderize", server.uri()),
    }
}

fn gemini_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

async fn mount_public_apis(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/agify"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": name, "age": 38 })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nationalize"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "country": [{ "country_id": "PH", "probability": 0.5 }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/genderize"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": name,
            "gender": "female",
            "probability": 0.98
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_llm_answer_is_cached() {
    let server = MockServer::start().await;
    let profile = json!({
        "name": "Maria",
        "meaning": "Beloved",
        "origin": "Hebrew",
        "gender": "female",
        "famous_bearers": ["Maria Clara"],
        "variations": ["Mary", "Mariah"]
    });

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply(&format!("```json\n{}\n```", profile))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(NameCache::in_memory().unwrap());
    let llm = GeminiClient::with_base(&server.uri(), "test-key", "test-model");
    let provider = NameMeaningProvider::new(Some(cache.clone()), Some(llm), api_urls(&server));

    let first = provider.analyze_name("  maria ").await;
    assert_eq!(first.source, AnalysisSource::Llm);
    let text = first.formatted_description();
    assert!(text.starts_with("🔍 NAME ANALYSIS: Maria"));
    assert!(text.contains("📋 MEANING: Beloved"));
    assert!(text.contains("⚥ GENDER: Female"));
    assert!(text.contains("🎨 VARIATIONS: Mary, Mariah"));
    assert_eq!(cache.len().unwrap(), 1);

    let second = provider.analyze_name("MARIA").await;
    assert_eq!(second.source, AnalysisSource::Cache);
    assert_eq!(second.formatted_description(), text);
}

#[tokio::test]
async fn test_llm_failure_falls_back_to_public_apis() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;
    mount_public_apis(&server, "Luz").await;

    let cache = Arc::new(NameCache::in_memory().unwrap());
    let llm = GeminiClient::with_base(&server.uri(), "test-key", "test-model");
    let provider = NameMeaningProvider::new(Some(cache.clone()), Some(llm), api_urls(&server));

    let analysis = provider.analyze_name("luz").await;
    assert_eq!(analysis.source, AnalysisSource::PublicApis);
    match &analysis.details {
        NameDetails::Estimate(estimate) => {
            assert_eq!(estimate.age_prediction, Some(38));
            assert_eq!(estimate.gender.as_deref(), Some("Female"));
            assert_eq!(estimate.gender_probability, Some(98.0));
        }
        other => panic!("expected an estimate, got {other:?}"),
    }

    let text = analysis.formatted_description();
    assert!(text.contains("🌍 ORIGIN: Philippines (confidence: 50.0%)"));
    assert!(text.contains("Most likely Female (probability: 98.0%)"));
    assert!(text.contains("around age 38"));

    // Fallback answers are not cached.
    assert!(cache.is_empty().unwrap());
}

#[tokio::test]
async fn test_malformed_llm_json_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply("I think it means light.")))
        .mount(&server)
        .await;
    mount_public_apis(&server, "Luz").await;

    let llm = GeminiClient::with_base(&server.uri(), "test-key", "test-model");
    let provider = NameMeaningProvider::new(None, Some(llm), api_urls(&server));

    let analysis = provider.analyze_name("Luz").await;
    assert_eq!(analysis.source, AnalysisSource::PublicApis);
}

#[tokio::test]
async fn test_nothing_found_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let provider = NameMeaningProvider::new(None, None, api_urls(&server));
    assert!(!provider.has_llm());

    let analysis = provider.analyze_name("xyzzy").await;
    assert_eq!(analysis.source, AnalysisSource::PublicApis);
    assert_eq!(
        analysis.formatted_description(),
        "❌ No detailed information found for the name Xyzzy. "
    );
}

#[tokio::test]
async fn test_cache_file_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let db = tmp.path().join("data").join("name_cache.db");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gemini_reply(r#"{"name": "Tala", "meaning": "Bright star"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    {
        let cache = Arc::new(NameCache::open(&db).unwrap());
        let llm = GeminiClient::with_base(&server.uri(), "test-key", "test-model");
        let provider = NameMeaningProvider::new(Some(cache), Some(llm), api_urls(&server));
        assert_eq!(provider.analyze_name("tala").await.source, AnalysisSource::Llm);
    }

    let cache = Arc::new(NameCache::open(&db).unwrap());
    let provider = NameMeaningProvider::new(Some(cache), None, api_urls(&server));
    let analysis = provider.analyze_name("Tala").await;
    assert_eq!(analysis.source, AnalysisSource::Cache);
    assert!(analysis.formatted_description().contains("📋 MEANING: Bright star"));
}
