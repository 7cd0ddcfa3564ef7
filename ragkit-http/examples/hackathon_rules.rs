//! Create a collection, ingest a rules document and ask about it.
//!
//! Run with:
//! ```bash
//! RAG_API_KEY=... cargo run -p ragkit-http --example hackathon_rules -- path/to/rules.pdf
//! ```

use anyhow::Context;
use ragkit_core::logging::init_stdout_logging;
use ragkit_core::prelude::*;

const COLLECTION: &str = "hackathon_rules";
const EMBEDDING_MODEL: &str = "mistral-embed";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_stdout_logging("info")?;

    let rules_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "rules.pdf".to_string());

    let config = RagConfig::from_env()?;
    let api_key = config.require_api_key()?.clone();
    let client = ragkit_http::connect(config)?;

    match client.collections().create_collection(COLLECTION).await {
        Ok(_) => tracing::info!(collection = COLLECTION, "collection created"),
        // Already there from a previous run
        Err(e) if e.is_client_error() => {
            tracing::info!(collection = COLLECTION, error = %e, "collection not created")
        }
        Err(e) => return Err(e.into()),
    }

    let upload =
        DocumentUpload::from_path(COLLECTION, &rules_path, EMBEDDING_MODEL, api_key.clone());
    let receipt = client
        .documents()
        .add_document(&upload)
        .await
        .with_context(|| format!("uploading {}", rules_path))?;
    tracing::info!(document_id = ?receipt.document_id, "document ingested");

    let mut history = History::new();
    for question in ["What is the deadline?", "How many people per team?"] {
        let request = QueryRequest::new(question, COLLECTION, api_key.clone())
            .with_history(history.clone());

        let chunks = client
            .inspector()
            .get_retrieved_chunks(&ChunkQuery::from(&request))
            .await?;
        tracing::info!(retrieved = chunks.len(), "chunks retrieved");

        let answer = client.query().get_answer(&request).await?;
        match answer.answer() {
            Some(text) => {
                println!("Q: {}\nA: {}\n", question, text);
                history.record_exchange(question, text);
            }
            None => println!("Q: {}\nno `answer` field in response: {}\n", question, answer.raw()),
        }
    }

    Ok(())
}
