//! Test helper module
//!
//! Provides an in-memory resource client and factories for controllers.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cadet_console_client::{
    ClientError, ListPage, ListQuery, Record, RecordId, ResourceClient, ResourceEndpoint,
    Result,
};
use serde_json::{json, Value};
use tokio::sync::{Notify, RwLock};

use crate::schema::{cadet_schema, school_schema, value_text, ResourceSchema};
use crate::services::ControllerContext;
use crate::state::Notifier;

// ===== MockResourceClient =====

pub struct MockResourceClient {
    schema: Arc<ResourceSchema>,
    notifier: Arc<Notifier>,
    records: RwLock<Vec<Record>>,
    next_id: AtomicU64,
    calls: RwLock<Vec<String>>,
    /// One-shot failures keyed by operation name.
    failures: RwLock<HashMap<String, ClientError>>,
    /// Gates awaited by upcoming calls, keyed by operation name. `list`
    /// waits after computing its page, `get` and `delete` before touching
    /// the records.
    gates: RwLock<HashMap<String, VecDeque<Arc<Notify>>>>,
    reported_total: RwLock<Option<u64>>,
    stats: RwLock<Option<Record>>,
    queries: RwLock<Vec<ListQuery>>,
    payloads: RwLock<Vec<Record>>,
    deleted: RwLock<Vec<RecordId>>,
}

impl MockResourceClient {
    pub fn new(schema: Arc<ResourceSchema>, notifier: Arc<Notifier>) -> Self {
        Self {
            schema,
            notifier,
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            calls: RwLock::new(Vec::new()),
            failures: RwLock::new(HashMap::new()),
            gates: RwLock::new(HashMap::new()),
            reported_total: RwLock::new(None),
            stats: RwLock::new(None),
            queries: RwLock::new(Vec::new()),
            payloads: RwLock::new(Vec::new()),
            deleted: RwLock::new(Vec::new()),
        }
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Store a record directly, assigning it an id.
    pub async fn seed(&self, mut record: Record) -> RecordId {
        let id = RecordId::from(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        record.insert(Record::ID_FIELD, id.as_str());
        self.records.write().await.push(record);
        id
    }

    pub async fn remove(&self, id: &RecordId) {
        self.records.write().await.retain(|r| r.id().as_ref() != Some(id));
    }

    pub async fn get_record(&self, id: &RecordId) -> Option<Record> {
        self.find(id).await
    }

    pub async fn fail_next(&self, op: &str, err: ClientError) {
        self.failures.write().await.insert(op.to_string(), err);
    }

    /// Make the next `op` call wait until `gate` is notified.
    pub async fn hold_next(&self, op: &str, gate: Arc<Notify>) {
        self.gates
            .write()
            .await
            .entry(op.to_string())
            .or_default()
            .push_back(gate);
    }

    /// Override the total reported by `list`.
    pub async fn report_total(&self, total: Option<u64>) {
        *self.reported_total.write().await = total;
    }

    pub async fn set_stats(&self, stats: Value) {
        *self.stats.write().await = Record::from_value(stats);
    }

    pub async fn call_count(&self, op: &str) -> usize {
        self.calls.read().await.iter().filter(|c| *c == op).count()
    }

    pub async fn last_query(&self) -> Option<ListQuery> {
        self.queries.read().await.last().cloned()
    }

    pub async fn last_payload(&self) -> Option<Record> {
        self.payloads.read().await.last().cloned()
    }

    pub async fn deleted(&self) -> Vec<RecordId> {
        self.deleted.read().await.clone()
    }

    async fn enter(&self, op: &str) -> Result<()> {
        self.calls.write().await.push(op.to_string());
        match self.failures.write().await.remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn pass_gate(&self, op: &str) {
        let gate = self
            .gates
            .write()
            .await
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    async fn find(&self, id: &RecordId) -> Option<Record> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id().as_ref() == Some(id))
            .cloned()
    }

    fn not_found(&self, id: &RecordId) -> ClientError {
        ClientError::NotFound {
            resource: self.resource().to_string(),
            id: id.to_string(),
            raw_message: None,
        }
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    fn endpoint(&self) -> &ResourceEndpoint {
        &self.schema.endpoint
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        self.enter("list").await?;
        self.queries.write().await.push(query.clone());

        let matching: Vec<Record> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| {
                query
                    .filters
                    .iter()
                    .all(|(k, v)| r.get(k).map(value_text).as_deref() == Some(v.as_str()))
            })
            .cloned()
            .collect();
        let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
        let items: Vec<Record> = matching
            .iter()
            .skip(offset)
            .take(query.pagination.page_size as usize)
            .cloned()
            .collect();
        let total = self
            .reported_total
            .read()
            .await
            .unwrap_or(matching.len() as u64);

        self.pass_gate("list").await;
        Ok(ListPage::new(items, total))
    }

    async fn get(&self, id: &RecordId) -> Result<Record> {
        self.enter("get").await?;
        self.pass_gate("get").await;
        self.find(id).await.ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, payload: &Record) -> Result<Record> {
        self.enter("create").await?;
        self.payloads.write().await.push(payload.clone());
        let id = self.seed(payload.clone()).await;
        self.find(&id).await.ok_or_else(|| self.not_found(&id))
    }

    async fn update(&self, id: &RecordId, payload: &Record) -> Result<Record> {
        self.enter("update").await?;
        self.payloads.write().await.push(payload.clone());
        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| r.id().as_ref() == Some(id))
            .ok_or_else(|| self.not_found(id))?;
        let mut updated = payload.clone();
        updated.insert(Record::ID_FIELD, id.as_str());
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.enter("delete").await?;
        self.pass_gate("delete").await;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id().as_ref() != Some(id));
        if records.len() == before {
            return Err(self.not_found(id));
        }
        self.deleted.write().await.push(id.clone());
        Ok(())
    }

    async fn stats(&self) -> Result<Option<Record>> {
        self.enter("stats").await?;
        if self.schema.endpoint.stats.is_none() {
            return Ok(None);
        }
        Ok(Some(self.stats.read().await.clone().unwrap_or_default()))
    }
}

// ===== Factories =====

fn setup_with(schema: ResourceSchema) -> (Arc<MockResourceClient>, Arc<ControllerContext>) {
    let notifier = Arc::new(Notifier::default());
    let schema = Arc::new(schema);
    let mock = Arc::new(MockResourceClient::new(schema.clone(), notifier.clone()));
    let ctx = Arc::new(ControllerContext::new(mock.clone(), schema, notifier));
    (mock, ctx)
}

/// Mock client and context for the school resource, page size 10.
pub fn setup() -> (Arc<MockResourceClient>, Arc<ControllerContext>) {
    match school_schema() {
        Ok(schema) => setup_with(schema),
        Err(e) => panic!("school schema: {e}"),
    }
}

pub fn setup_cadets() -> (Arc<MockResourceClient>, Arc<ControllerContext>) {
    match cadet_schema() {
        Ok(schema) => setup_with(schema),
        Err(e) => panic!("cadet schema: {e}"),
    }
}

/// A complete school record with one training session.
pub fn school(name: &str, district: &str) -> Record {
    let value = json!({
        "name": name,
        "district": district,
        "municipality": "Pokhara",
        "ward_number": 7,
        "area_name": null,
        "official_email": null,
        "phone_number": "061-520000",
        "website": null,
        "principal_name": "R. Thapa",
        "principal_contact": "9800000001",
        "teacher_name": null,
        "teacher_contact": null,
        "notes": null,
        "training_sessions": [
            {
                "ncc_batch": "2080-A",
                "start_date": "2024-01-15",
                "passout_date": null,
                "division": "junior"
            }
        ]
    });
    Record::from_value(value).unwrap_or_default()
}
