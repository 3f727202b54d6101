//! Pipeline integration tests: stage order, degradation of retrieval and completion, button
//! turns, topic continuity and the follow-up flag.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{analyzed, analyzer, fast_config, input, FailingStrategy, LlmBehavior, MockLlm, SlowStrategy};
use llm_client::CompletionOptions;
use pipeline::{Pipeline, ResponseSource, Stage, Topic};
use prompt::MessageRole;

#[tokio::test]
async fn test_completion_reply_is_used_with_assembled_prompt() {
    let llm = MockLlm::replying("Enrollment opens on 1 July.");
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_llm(llm.clone(), CompletionOptions::default());

    let turn = pipeline.run(input("How do I enroll for the winter semester?")).await;

    assert_eq!(turn.stage, Stage::Done);
    assert_eq!(turn.response, "Enrollment opens on 1 July.");
    assert_eq!(turn.response_source, ResponseSource::Completion);
    assert!(turn.completion_error.is_none());
    assert!(turn.personalization.is_some());
    assert!(turn.prompt.is_some());

    let requests = llm.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0];
    assert_eq!(messages[0].role, MessageRole::System);
    let last = messages.last().unwrap();
    assert_eq!(last.role, MessageRole::User);
    assert_eq!(last.content, "How do I enroll for the winter semester?");
}

#[tokio::test]
async fn test_without_llm_reply_comes_from_template() {
    let pipeline = Pipeline::new(analyzer(), fast_config());
    let turn = pipeline.run(input("Hello there")).await;

    assert_eq!(turn.stage, Stage::Done);
    assert_eq!(turn.response_source, ResponseSource::Template);
    assert!(!turn.response.is_empty());
    assert!(turn.completion_error.is_none());
}

#[tokio::test]
async fn test_failed_completion_falls_back_to_template() {
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_llm(MockLlm::new(LlmBehavior::Fail), CompletionOptions::default());

    let turn = pipeline.run(input("Which master programs do you offer?")).await;

    assert_eq!(turn.response_source, ResponseSource::Template);
    assert!(!turn.response.is_empty());
    let error = turn.completion_error.expect("error recorded");
    assert!(error.contains("HTTP 500"), "{}", error);
}

#[tokio::test]
async fn test_slow_completion_times_out_to_template() {
    let pipeline = Pipeline::new(analyzer(), fast_config()).with_llm(
        MockLlm::new(LlmBehavior::Slow(Duration::from_secs(5))),
        CompletionOptions::default(),
    );

    let started = Instant::now();
    let turn = pipeline.run(input("Where is the library?")).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(turn.response_source, ResponseSource::Template);
    assert!(turn.completion_error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_blank_completion_falls_back_to_template() {
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_llm(MockLlm::replying("   "), CompletionOptions::default());

    let turn = pipeline.run(input("Where is the library?")).await;

    assert_eq!(turn.response_source, ResponseSource::Template);
    assert!(!turn.response.trim().is_empty());
}

#[tokio::test]
async fn test_slow_knowledge_retrieval_does_not_block_the_turn() {
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_knowledge(Arc::new(SlowStrategy {
            delay: Duration::from_secs(5),
        }))
        .with_llm(MockLlm::replying("ok"), CompletionOptions::default());

    let started = Instant::now();
    let turn = pipeline.run(input("What are the exam dates?")).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(turn.stage, Stage::Done);
    assert!(turn.bundle.passages.is_empty());
    assert_eq!(turn.response, "ok");
}

#[tokio::test]
async fn test_failing_strategies_leave_context_empty() {
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_aggregator(Arc::new(FailingStrategy))
        .with_similarity(Arc::new(FailingStrategy))
        .with_knowledge(Arc::new(FailingStrategy));

    let turn = pipeline.run(input("What are the exam dates?")).await;

    assert_eq!(turn.stage, Stage::Done);
    assert!(turn.bundle.is_empty());
    assert!(!turn.response.is_empty());
}

#[tokio::test]
async fn test_button_turn_carries_previous_intent_and_skips_completion() {
    let llm = MockLlm::replying("should not be used");
    let pipeline = Pipeline::new(analyzer(), fast_config())
        .with_llm(llm.clone(), CompletionOptions::default());

    let mut turn_input = input("BTN:show_all_programs");
    turn_input.history = vec![analyzed(1, "Which bachelor programs exist?", "bachelor_programs_student")];
    let turn = pipeline.run(turn_input).await;

    assert!(turn.is_button());
    assert_eq!(turn.response_source, ResponseSource::Button);
    assert!(turn.response.starts_with("All bachelor programs:"));
    assert_eq!(turn.classification.intent, "bachelor_programs_student");
    assert_eq!(turn.classification.confidence, 1.0);
    assert_eq!(turn.topic, Topic::BachelorPrograms);
    assert_eq!(turn.topic_depth, 1);
    assert!(turn.prompt.is_none());
    assert_eq!(llm.request_count(), 0);
    assert!(!turn.requires_followup);
}

#[tokio::test]
async fn test_change_topic_button_resets_topic() {
    let pipeline = Pipeline::new(analyzer(), fast_config());

    let mut turn_input = input("BTN:change_topic");
    turn_input.history = vec![
        analyzed(1, "Master programs?", "master_programs_student"),
        analyzed(3, "And prerequisites?", "master_programs_student"),
    ];
    let turn = pipeline.run(turn_input).await;

    assert_eq!(turn.topic, Topic::General);
    assert_eq!(turn.topic_depth, 0);
    assert_eq!(turn.classification.intent, "general_query");
    assert!(!turn.interactive.continue_conversation);
}

#[tokio::test]
async fn test_low_confidence_requires_followup() {
    let pipeline = Pipeline::new(analyzer(), fast_config());
    let turn = pipeline.run(input("zzqx vvbn plok")).await;

    assert!(turn.classification.confidence < 0.7);
    assert!(turn.requires_followup);
}

#[tokio::test]
async fn test_interactive_elements_are_attached() {
    let pipeline = Pipeline::new(analyzer(), fast_config());
    let turn = pipeline.run(input("Hello")).await;

    assert!(!turn.suggested_queries.is_empty());
}
