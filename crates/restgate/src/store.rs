//! `MemoryStore`, the demo `db` service.
//!
//! JSON documents keyed by resource path. A resource ending in `/` names a
//! collection: `GET todo/` lists the documents under `todo/`, `POST todo/`
//! stores a document under a generated key and `DELETE todo/` clears the
//! collection. Any other resource names a single document.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use restgate_core::{GateError, GateResult, ServiceCall, ServiceObject, Verb};
use serde_json::{json, Map, Value};

/// An in-memory JSON document store.
///
/// ```
/// use restgate::store::MemoryStore;
/// use serde_json::json;
///
/// let store = MemoryStore::new();
/// store.insert("todo/1", json!({ "title": "write docs" }));
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<String, Value>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a document, replacing any existing one.
    pub fn insert(&self, path: impl Into<String>, document: Value) {
        self.documents.write().insert(path.into(), document);
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }

    fn get(&self, resource: &str) -> GateResult<Value> {
        if resource.is_empty() || resource.ends_with('/') {
            let documents = self.documents.read();
            let records: Vec<Value> = documents
                .iter()
                .filter(|(path, _)| path.starts_with(resource))
                .map(|(path, document)| record(path, document.clone()))
                .collect();
            return Ok(json!({ "record": records }));
        }

        self.documents
            .read()
            .get(resource)
            .map(|document| record(resource, document.clone()))
            .ok_or_else(|| missing(resource))
    }

    fn create(&self, resource: &str, document: Value) -> GateResult<Value> {
        let path = if resource.ends_with('/') {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            format!("{resource}{id}")
        } else {
            resource.to_string()
        };

        let mut documents = self.documents.write();
        if documents.contains_key(&path) {
            return Err(GateError::conflict(format!("Record '{path}' already exists.")));
        }
        documents.insert(path.clone(), document.clone());
        Ok(record(&path, document))
    }

    fn replace(&self, resource: &str, document: Value) -> GateResult<Value> {
        self.documents
            .write()
            .insert(resource.to_string(), document.clone());
        Ok(record(resource, document))
    }

    fn merge(&self, resource: &str, patch: Value) -> GateResult<Value> {
        let Value::Object(patch) = patch else {
            return Err(GateError::bad_request("MERGE requires a JSON object body."));
        };

        let mut documents = self.documents.write();
        let document = documents.get_mut(resource).ok_or_else(|| missing(resource))?;
        let Value::Object(fields) = &mut *document else {
            return Err(GateError::conflict(format!(
                "Record '{resource}' is not an object and cannot be merged."
            )));
        };
        for (key, value) in patch {
            fields.insert(key, value);
        }
        Ok(record(resource, document.clone()))
    }

    fn delete(&self, resource: &str) -> GateResult<Value> {
        let mut documents = self.documents.write();
        if resource.ends_with('/') {
            let before = documents.len();
            documents.retain(|path, _| !path.starts_with(resource));
            return Ok(json!({ "deleted": before - documents.len() }));
        }

        documents
            .remove(resource)
            .map(|document| record(resource, document))
            .ok_or_else(|| missing(resource))
    }
}

#[async_trait]
impl ServiceObject for MemoryStore {
    async fn process_request(&self, call: ServiceCall<'_>) -> GateResult<Value> {
        let resource = call.resource;
        if resource.is_empty() && call.verb != Verb::Get {
            return Err(GateError::bad_request(format!(
                "{} requires a resource path.",
                call.verb
            )));
        }

        match call.verb {
            Verb::Get => self.get(resource),
            Verb::Post => self.create(resource, document_body(&call)?),
            Verb::Put => self.replace(resource, document_body(&call)?),
            Verb::Merge => self.merge(resource, document_body(&call)?),
            Verb::Delete => self.delete(resource),
        }
    }
}

fn document_body(call: &ServiceCall<'_>) -> GateResult<Value> {
    match call.json_body()? {
        Value::Null => Err(GateError::bad_request("A JSON document body is required.")),
        document => Ok(document),
    }
}

fn record(path: &str, document: Value) -> Value {
    let mut record = Map::new();
    record.insert("path".to_string(), Value::String(path.to_string()));
    record.insert("document".to_string(), document);
    Value::Object(record)
}

fn missing(resource: &str) -> GateError {
    GateError::not_found(format!("Record '{resource}' not found."))
}
