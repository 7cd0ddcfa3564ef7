//! Collection management

use std::sync::Arc;

use crate::endpoints;
use crate::error::Result;
use crate::response::{Ack, CollectionList};
use crate::transport::{call, ApiRequest, Transport};

/// Creates, lists and deletes collections
///
/// Name uniqueness is the service's business. A duplicate create or an
/// unknown delete comes back as [`Error::Remote`](crate::Error::Remote).
pub struct CollectionManager<T: Transport + ?Sized> {
    transport: Arc<T>,
}

impl<T: Transport + ?Sized> CollectionManager<T> {
    /// Create a manager over a shared transport
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Create a collection
    pub async fn create_collection(&self, name: &str) -> Result<Ack> {
        tracing::debug!(collection = name, "creating collection");
        let request = ApiRequest::post(endpoints::COLLECTION_NEW).query("name", name);
        call(self.transport.as_ref(), request).await
    }

    /// List collection names
    pub async fn list_collections(&self) -> Result<CollectionList> {
        call(self.transport.as_ref(), ApiRequest::get(endpoints::COLLECTION_LIST)).await
    }

    /// Delete a collection
    pub async fn delete_collection(&self, name: &str) -> Result<Ack> {
        tracing::debug!(collection = name, "deleting collection");
        let request = ApiRequest::delete(endpoints::COLLECTION_DELETE).query("name", name);
        call(self.transport.as_ref(), request).await
    }
}
