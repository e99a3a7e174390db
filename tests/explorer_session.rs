// OneHand Explorer Session Tests
// Copyright (c) 2026 Xing_The_Creator | OneHand

use std::io::Cursor;
use std::sync::Arc;

use onehand_core::explorer::NameMeaningExplorer;
use onehand_core::names::public_apis::PublicApiUrls;
use onehand_core::names::{AnalysisSource, NameMeaningProvider};
use onehand_core::stage::input::PromptInput;
use onehand_core::stage::sounds::SoundBoard;
use onehand_core::stage::{Pace, Stage};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn explorer(server: &MockServer) -> NameMeaningExplorer<Vec<u8>> {
    let urls = PublicApiUrls {
        age: format!("{}/agify", server.uri()),
        origin: format!("{}/nationalize", server.uri()),
        gender: format!("{}/genderize", server.uri()),
    };
    let provider = Arc::new(NameMeaningProvider::new(None, None, urls));
    let stage = Stage::new(Vec::new(), SoundBoard::silent(), Pace::instant());
    NameMeaningExplorer::new(stage, provider)
}

fn transcript(explorer: NameMeaningExplorer<Vec<u8>>) -> String {
    String::from_utf8(explorer.into_stage().into_inner()).unwrap()
}

#[tokio::test]
async fn test_session_handles_blank_input_and_quit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut explorer = explorer(&server);
    explorer.intro().unwrap();
    explorer
        .run(PromptInput::from_reader(Cursor::new(
            b"\n   \nxyzzy\nQUIT\nnever read\n".to_vec(),
        )))
        .await
        .unwrap();

    let text = transcript(explorer);
    assert!(text.contains("🔍 NAME MEANING EXPLORER"));
    assert_eq!(text.matches("⚠️  Please enter a valid name.").count(), 2);
    assert!(text.contains("🔄 Analyzing name: 'Xyzzy'"));
    assert!(text.contains("🌍 Fetching etymology data..."));
    assert!(text.contains("📊 NAME ANALYSIS RESULTS"));
    assert!(text.contains("  ❌ No detailed information found for the name Xyzzy."));
    assert!(text.contains("👋 Thank you for exploring name meanings!"));
    assert!(!text.contains("never read"));
}

#[tokio::test]
async fn test_end_of_input_ends_session() {
    let server = MockServer::start().await;
    let mut explorer = explorer(&server);

    explorer
        .run(PromptInput::from_reader(Cursor::new(Vec::new())))
        .await
        .unwrap();
    assert!(transcript(explorer).contains("👋 Thank you for exploring name meanings!"));
}

#[tokio::test]
async fn test_ctrl_c_at_prompt_ends_session() {
    let server = MockServer::start().await;
    let mut explorer = explorer(&server);

    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    tx.send(()).unwrap();
    let input = PromptInput::from_reader(Cursor::new(b"maria\n".to_vec())).with_interrupts(rx);

    explorer.run(input).await.unwrap();

    let text = transcript(explorer);
    assert!(!text.contains("Analyzing name"));
    assert!(text.contains("👋 Thank you for exploring name meanings!"));
}

#[tokio::test]
async fn test_blank_one_shot_name_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let mut explorer = explorer(&server);
    assert!(explorer.analyze_entry("   ").await.unwrap().is_none());
    assert_eq!(transcript(explorer), "⚠️  Please enter a valid name.\n");
}

#[tokio::test]
async fn test_one_shot_analysis_prints_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genderize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "andres",
            "gender": "male",
            "probability": 0.99
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut explorer = explorer(&server);
    let analysis = explorer.analyze_concurrently("andres").await.unwrap();
    assert_eq!(analysis.source, AnalysisSource::PublicApis);

    let text = transcript(explorer);
    assert!(text.contains("🔄 Analyzing name: 'Andres'"));
    assert!(text.contains("  🔍 NAME ANALYSIS: Andres"));
    assert!(text.contains("  ⚥ GENDER PREDICTION: Most likely Male (probability: 99.0%)"));
}
