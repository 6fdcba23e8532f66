use std::sync::Arc;

use agora_runtime::{AIProvider, GenerateRequest, ModelSpec, ProviderRegistry, RuntimeConfig};
use httpmock::prelude::*;

fn network_tests_enabled() -> bool {
    matches!(std::env::var("AGORA_RUN_NETWORK_TESTS"), Ok(value) if value == "1")
}

#[tokio::test]
async fn configured_provider_answers_through_registry() {
    if !network_tests_enabled() {
        eprintln!("skipping network test: set AGORA_RUN_NETWORK_TESTS=1 to enable");
        return;
    }

    let server = MockServer::start_async().await;
    let completion_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer test-api-key")
                .body_includes("\"model\":\"gpt-4o-mini\"");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "id": "chatcmpl-mock-1",
                    "object": "chat.completion",
                    "created": 1700000000,
                    "model": "gpt-4o-mini",
                    "choices": [
                        {
                            "index": 0,
                            "message": {"role": "assistant", "content": "mocked answer"},
                            "finish_reason": "stop"
                        }
                    ],
                    "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
                }));
        })
        .await;

    let config = RuntimeConfig {
        openai_api_key: Some("test-api-key".to_string()),
        openai_base_url: server.base_url(),
        ..RuntimeConfig::default()
    };
    let spec = config.simulation_model_spec().unwrap();

    let registry = ProviderRegistry::new();
    let provider = registry.get_or_build(&config, &spec).await.unwrap();
    assert_eq!(provider.name(), "openai");

    let default_provider = registry
        .get_default()
        .await
        .expect("default provider should exist");
    assert!(Arc::ptr_eq(&default_provider, &provider));

    let response = default_provider
        .generate(
            GenerateRequest::new("Say mocked answer")
                .with_max_tokens(32)
                .with_temperature(0.0),
        )
        .await
        .expect("provider generate should succeed");

    completion_mock.assert_async().await;
    assert_eq!(response.content, "mocked answer");
    assert_eq!(response.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[test]
fn unknown_model_never_reaches_the_network() {
    let err = ModelSpec::parse("openai:gpt-unknown").unwrap_err();
    assert_eq!(err.to_string(), "model openai:gpt-unknown not found");
}
