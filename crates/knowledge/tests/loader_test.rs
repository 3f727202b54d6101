//! Tests for the JSON-lines knowledge loader.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use assist_core::{Language, UserCategory};
use async_trait::async_trait;
use embedding::EmbeddingService;
use knowledge::{load_jsonl, parse_jsonl, KnowledgeFilter, KnowledgeIndex};

/// Embeds a text as `[len, vowel count]` and counts batch requests.
struct CountingEmbedder {
    batches: AtomicUsize,
}

fn vector(text: &str) -> Vec<f32> {
    let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count();
    vec![text.len() as f32, vowels as f32]
}

#[async_trait]
impl EmbeddingService for CountingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        Ok(vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        self.batches.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| vector(t)).collect())
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingService for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, anyhow::Error> {
        anyhow::bail!("embedding backend unavailable")
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        anyhow::bail!("embedding backend unavailable")
    }
}

const SAMPLE: &str = r#"
# HNU knowledge sample
{"id": "kb-1", "text": "Enrollment for the summer semester opens in January.", "language": "en", "category": "student", "source": "admissions"}
{"id": "kb-2", "text": "Die Bibliothek ist von 8 bis 20 Uhr geöffnet.", "language": "de"}
{"id": "kb-3", "text": "Reset your password in the IT self-service portal."}
"#;

#[test]
fn test_parse_jsonl_reads_optional_fields() {
    let docs = parse_jsonl(SAMPLE).unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(docs[0].category, Some(UserCategory::Student));
    assert_eq!(docs[0].source.as_deref(), Some("admissions"));
    assert_eq!(docs[1].language, Some(Language::De));
    assert!(docs[2].language.is_none());
}

#[test]
fn test_parse_jsonl_reports_line() {
    let err = parse_jsonl("{\"id\": \"ok\", \"text\": \"fine\"}\nnot json\n").unwrap_err();
    assert!(format!("{:#}", err).contains("line 2"));

    let err = parse_jsonl("{\"id\": \"empty\", \"text\": \"  \"}").unwrap_err();
    assert!(err.to_string().contains("empty text"));
}

#[tokio::test]
async fn test_load_jsonl_embeds_in_batches() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let embedder = CountingEmbedder {
        batches: AtomicUsize::new(0),
    };
    let index = load_jsonl(file.path(), &embedder, 2).await.unwrap();
    assert_eq!(index.len().await.unwrap(), 3);
    assert_eq!(embedder.batches.load(Ordering::SeqCst), 2);

    let query = vector("Enrollment for the summer semester opens in January.");
    let hits = index
        .search(&query, 1, KnowledgeFilter::language(Language::En))
        .await
        .unwrap();
    assert_eq!(hits[0].passage_id, "kb-1");
}

#[tokio::test]
async fn test_load_jsonl_propagates_embedding_failure() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    assert!(load_jsonl(file.path(), &FailingEmbedder, 10).await.is_err());
}

#[tokio::test]
async fn test_load_jsonl_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = CountingEmbedder {
        batches: AtomicUsize::new(0),
    };
    let err = load_jsonl(dir.path().join("nope.jsonl"), &embedder, 10)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to read knowledge file"));
}
