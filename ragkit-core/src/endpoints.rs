//! Endpoint paths of the RAG service, relative to the base URL

/// `POST`, param `name`
pub const COLLECTION_NEW: &str = "/api/app/collection/new";
/// `GET`
pub const COLLECTION_LIST: &str = "/api/app/collection/list";
/// `DELETE`, param `name`
pub const COLLECTION_DELETE: &str = "/api/app/collection/delete";
/// `POST`, multipart file + `collection_name`, `model`, `api_key`
pub const COLLECTION_ADD_DOCUMENT: &str = "/api/app/collection/add-document";
/// `GET`, param `collection_name`
pub const COLLECTION_DOCUMENTS: &str = "/api/app/collection/documents";
/// `DELETE`, params `collection_name`, `document_id`
pub const COLLECTION_DOCUMENT: &str = "/api/app/collection/document";
/// `POST`, JSON body, combined retrieval and generation
pub const RETRIEVE_ANSWER: &str = "/api/app/inferencing/retrieve_answer_using_collections";
/// `POST`, JSON body, retrieval only
pub const GET_EMBEDDINGS: &str = "/api/app/inferencing/get_embeddings";
/// `POST` under the chatbot root, JSON `{query, collection}` with a bearer token
pub const BACK_APP: &str = "/api/app/back_app/";
