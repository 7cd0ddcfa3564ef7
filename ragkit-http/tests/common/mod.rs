//! In-process fake of the RAG service for integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use ragkit_core::config::CHATBOT_PREFIX;
use ragkit_core::endpoints;
use ragkit_http::{HttpTransport, RagClient, RagConfig};

pub const API_KEY: &str = "test-key";
const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

type Reply = (StatusCode, Json<Value>);
type Params = Query<HashMap<String, String>>;
type JsonFields = Json<HashMap<String, String>>;

/// A document held by the fake service
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub file_name: String,
    pub model: String,
    pub size: usize,
}

/// Everything the fake service saw or stores
#[derive(Default)]
pub struct FakeState {
    pub collections: Mutex<BTreeMap<String, Vec<StoredDocument>>>,
    pub answer_calls: Mutex<Vec<HashMap<String, String>>>,
    pub answer_query_strings: Mutex<Vec<Option<String>>>,
    pub embedding_calls: Mutex<Vec<HashMap<String, String>>>,
    pub upload_fields: Mutex<Vec<HashMap<String, String>>>,
    pub auth_headers: Mutex<Vec<Option<String>>>,
    next_id: Mutex<u64>,
}

pub struct FakeService {
    pub addr: SocketAddr,
    pub state: Arc<FakeState>,
}

impl FakeService {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn config(&self) -> RagConfig {
        RagConfig::new(self.base_url())
            .unwrap()
            .with_api_key(API_KEY)
    }

    pub fn client(&self) -> RagClient<HttpTransport> {
        ragkit_http::connect(self.config()).unwrap()
    }
}

pub async fn spawn() -> FakeService {
    let _ = tracing_subscriber::fmt::try_init();

    let state = Arc::new(FakeState::default());
    let app = Router::new()
        .route(endpoints::COLLECTION_NEW, post(create_collection))
        .route(endpoints::COLLECTION_LIST, get(list_collections))
        .route(endpoints::COLLECTION_DELETE, delete(delete_collection))
        .route(endpoints::COLLECTION_ADD_DOCUMENT, post(add_document))
        .route(endpoints::COLLECTION_DOCUMENTS, get(list_documents))
        .route(endpoints::COLLECTION_DOCUMENT, delete(delete_document))
        .route(endpoints::RETRIEVE_ANSWER, post(retrieve_answer))
        .route(endpoints::GET_EMBEDDINGS, post(get_embeddings))
        .route(&format!("{}{}", CHATBOT_PREFIX, endpoints::BACK_APP), post(back_app))
        .route("/test/not-json", get(not_json))
        .route("/test/empty", get(empty))
        .route("/test/slow", get(slow))
        .route("/test/form", post(echo_form))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeService { addr, state }
}

fn detail(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "detail": message })))
}

fn record_auth(state: &FakeState, headers: &HeaderMap) {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.auth_headers.lock().push(value);
}

async fn create_collection(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Params,
) -> Reply {
    record_auth(&state, &headers);
    let Some(name) = params.get("name") else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "field required: name");
    };
    let mut collections = state.collections.lock();
    if collections.contains_key(name) {
        return detail(StatusCode::CONFLICT, "Collection already exists");
    }
    collections.insert(name.clone(), Vec::new());
    (StatusCode::OK, Json(json!({ "message": "Collection created", "name": name })))
}

async fn list_collections(State(state): State<Arc<FakeState>>) -> Reply {
    let names: Vec<String> = state.collections.lock().keys().cloned().collect();
    (StatusCode::OK, Json(json!({ "collections": names })))
}

async fn delete_collection(State(state): State<Arc<FakeState>>, Query(params): Params) -> Reply {
    let name = params.get("name").cloned().unwrap_or_default();
    match state.collections.lock().remove(&name) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "Collection deleted" }))),
        None => detail(StatusCode::NOT_FOUND, "Collection not found"),
    }
}

async fn add_document(State(state): State<Arc<FakeState>>, mut multipart: Multipart) -> Reply {
    let mut fields = HashMap::new();
    let mut file: Option<(String, usize)> = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let data = field.bytes().await.unwrap();
            file = Some((file_name, data.len()));
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }
    state.upload_fields.lock().push(fields.clone());

    let Some((file_name, size)) = file else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "field required: file");
    };
    let extension = file_name.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return detail(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported file type");
    }

    let collection = fields.get("collection_name").cloned().unwrap_or_default();
    let mut collections = state.collections.lock();
    let Some(documents) = collections.get_mut(&collection) else {
        return detail(StatusCode::NOT_FOUND, "Collection not found");
    };

    let id = {
        let mut next = state.next_id.lock();
        *next += 1;
        format!("doc-{}", *next)
    };
    documents.push(StoredDocument {
        id: id.clone(),
        file_name,
        model: fields.get("model").cloned().unwrap_or_default(),
        size,
    });
    (StatusCode::OK, Json(json!({ "document_id": id, "status": "indexed" })))
}

async fn list_documents(State(state): State<Arc<FakeState>>, Query(params): Params) -> Reply {
    let collection = params.get("collection_name").cloned().unwrap_or_default();
    match state.collections.lock().get(&collection) {
        Some(docs) => {
            let docs: Vec<Value> = docs
                .iter()
                .map(|d| json!({ "id": d.id, "filename": d.file_name }))
                .collect();
            (StatusCode::OK, Json(json!({ "documents": docs })))
        }
        None => detail(StatusCode::NOT_FOUND, "Collection not found"),
    }
}

async fn delete_document(State(state): State<Arc<FakeState>>, Query(params): Params) -> Reply {
    let collection = params.get("collection_name").cloned().unwrap_or_default();
    let id = params.get("document_id").cloned().unwrap_or_default();
    let mut collections = state.collections.lock();
    let Some(docs) = collections.get_mut(&collection) else {
        return detail(StatusCode::NOT_FOUND, "Collection not found");
    };
    let before = docs.len();
    docs.retain(|d| d.id != id);
    if docs.len() == before {
        return detail(StatusCode::NOT_FOUND, "Document not found");
    }
    (StatusCode::OK, Json(json!({ "message": "Document deleted" })))
}

async fn retrieve_answer(
    State(state): State<Arc<FakeState>>,
    uri: Uri,
    Json(params): JsonFields,
) -> Reply {
    state.answer_query_strings.lock().push(uri.query().map(str::to_string));
    state.answer_calls.lock().push(params.clone());

    let collection = params.get("collection_name").cloned().unwrap_or_default();
    let sources: Vec<String> = match state.collections.lock().get(&collection) {
        Some(docs) => docs.iter().map(|d| d.file_name.clone()).collect(),
        None => return detail(StatusCode::NOT_FOUND, "Collection not found"),
    };
    if params.get("history_data").is_none() {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "field required: history_data");
    }
    if params.get("model_name").map(String::as_str) == Some("overloaded-model") {
        return detail(StatusCode::SERVICE_UNAVAILABLE, "Model overloaded");
    }

    let query = params.get("query").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({ "answer": format!("Answer to: {}", query), "sources": sources })),
    )
}

async fn get_embeddings(State(state): State<Arc<FakeState>>, Json(params): JsonFields) -> Reply {
    state.embedding_calls.lock().push(params.clone());
    let collection = params.get("collection_name").cloned().unwrap_or_default();
    match state.collections.lock().get(&collection) {
        Some(docs) => {
            let chunks: Vec<Value> = docs
                .iter()
                .map(|d| json!({ "content": format!("chunk of {}", d.file_name), "score": 0.75 }))
                .collect();
            (StatusCode::OK, Json(json!({ "chunks": chunks })))
        }
        None => detail(StatusCode::NOT_FOUND, "Collection not found"),
    }
}

async fn back_app(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    record_auth(&state, &headers);
    let expected = format!("Bearer {}", API_KEY);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected.as_str()) {
        return detail(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    let query = body["query"].as_str().unwrap_or_default();
    let collection = body["collection"].as_str().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({ "answer": format!("{} ({})", query, collection) })),
    )
}

async fn not_json() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>maintenance</html>")
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn slow() -> Reply {
    tokio::time::sleep(Duration::from_secs(5)).await;
    (StatusCode::OK, Json(json!({})))
}

async fn echo_form(axum::Form(fields): axum::Form<HashMap<String, String>>) -> Reply {
    (StatusCode::OK, Json(json!(fields)))
}
