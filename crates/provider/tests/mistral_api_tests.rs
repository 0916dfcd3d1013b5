//! HTTP-level tests for the Mistral client against a mock server

use pamm_provider::{ChatParams, Message, MistralProvider, Provider, ProviderError, ToolChoice};

fn params_with_user(content: &str) -> ChatParams {
    ChatParams {
        model: "mistral-large-latest".to_string(),
        messages: vec![Message::user(content)],
        tools: vec![],
        max_tokens: 512,
        temperature: 0.7,
        tool_choice: ToolChoice::Auto,
    }
}

#[tokio::test]
async fn chat_parses_text_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": "You have numpy 1.26.0."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 30, "completion_tokens": 9, "total_tokens": 39}
            }"#,
        )
        .create_async()
        .await;

    let provider = MistralProvider::new("test-key", Some(server.url()), None);
    let response = provider.chat(params_with_user("version of numpy?")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.content, Some("You have numpy 1.26.0.".to_string()));
    assert_eq!(response.usage.total_tokens, 39);
}

#[tokio::test]
async fn chat_parses_tool_call_response() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_abc",
                            "type": "function",
                            "function": {
                                "name": "install_package",
                                "arguments": "{\"package_name\": \"flask\", \"version\": \"2.0\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 40, "completion_tokens": 20, "total_tokens": 60}
            }"#,
        )
        .create_async()
        .await;

    let provider = MistralProvider::new("test-key", Some(server.url()), None);
    let response = provider.chat(params_with_user("install flask 2.0")).await.unwrap();

    let call = response.first_tool_call().unwrap();
    assert_eq!(call.id, "call_abc");
    assert_eq!(call.name, "install_package");
    assert_eq!(call.arguments["package_name"], "flask");
    assert_eq!(call.arguments["version"], "2.0");
}

#[tokio::test]
async fn chat_maps_api_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "invalid api key"}}"#)
        .create_async()
        .await;

    let provider = MistralProvider::new("bad-key", Some(server.url()), None);
    let result = provider.chat(params_with_user("hello")).await;

    match result {
        Err(ProviderError::Api(msg)) => assert_eq!(msg, "invalid api key"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn chat_maps_rate_limit() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "slow down"}}"#)
        .create_async()
        .await;

    let provider = MistralProvider::new("test-key", Some(server.url()), None);
    let result = provider.chat(params_with_user("hello")).await;

    assert!(matches!(result, Err(ProviderError::RateLimited)));
}
