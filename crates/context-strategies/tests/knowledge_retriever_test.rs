//! Tests for KnowledgeRetriever: ranking, clamping and graceful degradation.

mod common;

use std::sync::Arc;

use assist_core::{Language, UserCategory};
use context_strategies::{ContextRequest, ContextStrategy, KnowledgeRetriever, StrategyResult};
use knowledge::{InMemoryKnowledgeIndex, KnowledgeDocument, KnowledgeFilter};

use common::{keyword_vector, passage, FailingEmbedder, FailingIndex, FixedIndex, KeywordEmbedder};

async fn index() -> Arc<InMemoryKnowledgeIndex> {
    let index = InMemoryKnowledgeIndex::new();
    let docs = [
        ("kb-enroll", "Enroll online; enroll before the deadline.", Some(Language::En)),
        ("kb-library", "The library opens at 8.", Some(Language::En)),
        ("kb-exam", "Exam dates are published by the exam office.", Some(Language::En)),
        ("kb-de", "Einschreibung: enroll über das Portal.", Some(Language::De)),
    ];
    for (id, text, language) in docs {
        index
            .insert(
                KnowledgeDocument {
                    id: id.to_string(),
                    text: text.to_string(),
                    source: Some("faq".to_string()),
                    language,
                    category: None,
                },
                keyword_vector(text),
            )
            .await;
    }
    Arc::new(index)
}

#[tokio::test]
async fn test_search_returns_nearest_passages() {
    let retriever = KnowledgeRetriever::new(Arc::new(KeywordEmbedder), index().await);
    let passages = retriever
        .search_knowledge("How do I enroll?", 2, KnowledgeFilter::language(Language::En))
        .await;
    assert_eq!(passages.len(), 2);
    assert_eq!(passages[0].passage_id, "kb-enroll");
    assert!((passages[0].score - 1.0).abs() < 1e-6);
    assert_eq!(passages[1].passage_id, "kb-exam");
    assert_eq!(passages[1].score, 0.0);
}

#[tokio::test]
async fn test_scores_are_clamped_and_ordered() {
    let fixed = FixedIndex(vec![
        passage("b", 0.5),
        passage("z", 1.7),
        passage("a", 0.5),
        passage("neg", -0.3),
    ]);
    let retriever = KnowledgeRetriever::new(Arc::new(KeywordEmbedder), Arc::new(fixed));
    let passages = retriever
        .search_knowledge("anything", 3, KnowledgeFilter::default())
        .await;
    let ids: Vec<&str> = passages.iter().map(|p| p.passage_id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "b"]);
    assert_eq!(passages[0].score, 1.0);
}

#[tokio::test]
async fn test_failures_degrade_to_empty() {
    let retriever = KnowledgeRetriever::new(Arc::new(FailingEmbedder), index().await);
    assert!(retriever
        .search_knowledge("enroll", 5, KnowledgeFilter::default())
        .await
        .is_empty());

    let retriever = KnowledgeRetriever::new(Arc::new(KeywordEmbedder), Arc::new(FailingIndex));
    assert!(retriever
        .search_knowledge("enroll", 5, KnowledgeFilter::default())
        .await
        .is_empty());

    let retriever = KnowledgeRetriever::new(Arc::new(KeywordEmbedder), index().await);
    assert!(retriever
        .search_knowledge("   ", 5, KnowledgeFilter::default())
        .await
        .is_empty());
}

#[tokio::test]
async fn test_strategy_filters_by_request_language() {
    let retriever = KnowledgeRetriever::new(Arc::new(KeywordEmbedder), index().await).with_top_k(5);
    let request = ContextRequest {
        user_id: "alice",
        session_id: None,
        text: "enroll",
        language: Language::De,
        category: Some(UserCategory::Student),
    };
    match retriever.build_context(&request).await.unwrap() {
        StrategyResult::Knowledge(passages) => {
            assert!(passages.iter().all(|p| p.language == Some(Language::De)));
            assert_eq!(passages[0].passage_id, "kb-de");
        }
        other => panic!("expected Knowledge, got {:?}", other),
    }
}
