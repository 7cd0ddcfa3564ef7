//! # ragkit Core - client for a remote RAG service
//!
//! Core types, traits, and components for talking to a hosted
//! Retrieval-Augmented-Generation API.
//!
//! This crate provides:
//! - Transport (`transport`) - the `Transport` trait, request shape, mock
//! - Collections (`collections`) - create, list, delete collections
//! - Documents (`documents`) - upload, list, delete documents
//! - Query (`query`) - combined retrieval and generation
//! - Inspection (`inspect`) - retrieved chunks without generation
//! - Quiz (`quiz`) - quiz prompts and multiple-choice parsing
//! - History (`history`) - conversation turns and their wire encoding
//! - Responses (`response`) - typed views over response bodies
//!
//! The HTTP transport lives in `ragkit-http`.

#![warn(missing_docs)]

pub mod ask;
pub mod client;
pub mod collections;
pub mod config;
pub mod documents;
pub mod endpoints;
pub mod error;
pub mod history;
pub mod inspect;
pub mod logging;
pub mod query;
pub mod quiz;
pub mod response;
pub mod transport;

pub use error::{Error, Result};

/// Prelude - commonly used types
pub mod prelude {
    pub use crate::ask::QuickAsk;
    pub use crate::client::RagClient;
    pub use crate::collections::CollectionManager;
    pub use crate::config::{ApiKey, RagConfig};
    pub use crate::documents::{DocumentIngestor, DocumentSource, DocumentUpload};
    pub use crate::error::{Error, Result};
    pub use crate::history::{History, Role, Turn};
    pub use crate::inspect::{ChunkQuery, EmbeddingInspector};
    pub use crate::query::{QueryEngine, QueryRequest};
    pub use crate::quiz::{parse_question, ParsedQuestion, QuizGenerator, QuizRequest};
    pub use crate::response::{
        Ack, Answer, CollectionList, DocumentList, DocumentSummary, IngestReceipt, RetrievedChunk,
        RetrievedChunks,
    };
    pub use crate::transport::{
        ApiRequest, Body, FilePayload, Method, MockTransport, Root, Transport,
    };
}
