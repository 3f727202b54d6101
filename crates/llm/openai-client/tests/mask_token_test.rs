//! Tests for [`openai_client::mask_token`], [`openai_client::ChatReply`] and a live
//! completion smoke test.

use openai_client::{
    mask_token, ChatCompletionRequestUserMessageArgs, ChatReply, OpenAIClient,
};

#[test]
fn test_short_tokens_are_fully_masked() {
    for token in ["", "x", "sk-short", "sk-proj-12"] {
        assert_eq!(mask_token(token), "***", "token {:?}", token);
    }
}

#[test]
fn test_long_tokens_keep_head_and_tail() {
    assert_eq!(mask_token("sk-proj-abcdefghijklmnop"), "sk-proj***mnop");
    assert_eq!(mask_token("sk-live-000000000000"), "sk-live***0000");

    let masked = mask_token("sk-proj-1234567890abcdefghijklmnopqrstuvwxyz");
    assert_eq!(masked.len(), 7 + 3 + 4);
    assert!(!masked.contains("1234567890"));
}

#[test]
fn test_non_ascii_token_does_not_panic() {
    assert_eq!(mask_token("schlüssel-äöü-1234567"), "schlüss***4567");
}

#[test]
fn test_client_keeps_only_masked_key() {
    let client = OpenAIClient::new("sk-proj-abcdefghijklmnop".to_string(), Some(""));
    assert_eq!(client.masked_key(), "sk-proj***mnop");
}

#[test]
fn test_reply_without_finish_reason_is_not_truncated() {
    assert!(!ChatReply::default().is_truncated());
}

/// Requires `OPENAI_API_KEY` in the root `.env`.
#[tokio::test]
#[ignore]
async fn test_chat_completion_respects_token_limit() {
    dotenvy::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/../../../.env")).ok();
    let api_key = std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY not set");
    let base_url = std::env::var("OPENAI_BASE_URL").ok();
    let client = OpenAIClient::new(api_key, base_url.as_deref());

    let messages = vec![ChatCompletionRequestUserMessageArgs::default()
        .content("Reply with the single word: ready")
        .build()
        .map(Into::into)
        .expect("build message")];

    let reply = client
        .chat_completion("gpt-4o-mini", messages, 10, 0.0)
        .await
        .expect("completion");
    assert!(!reply.content.trim().is_empty());
    assert!(reply.usage.is_some());
}
