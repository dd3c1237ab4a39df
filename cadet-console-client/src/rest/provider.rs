//! `ResourceClient` trait implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::traits::{ResourceClient, StatusErrorMapper};
use crate::types::{ListPage, ListQuery, Record, RecordId, ResourceEndpoint};

use super::RestResourceClient;
use super::envelope::normalize_list;

#[async_trait]
impl ResourceClient for RestResourceClient {
    fn endpoint(&self) -> &ResourceEndpoint {
        &self.endpoint
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage> {
        let path = self.endpoint.list_path(query);
        let text = self.send(Method::GET, &path, None, None).await?;
        let body: serde_json::Value = self.decode(&text)?;
        let page = normalize_list(body).map_err(|detail| self.decode_error(detail))?;
        log::debug!(
            "[{}] Listed {} of {} items",
            self.resource_key(),
            page.items.len(),
            page.total
        );
        Ok(page)
    }

    async fn get(&self, id: &RecordId) -> Result<Record> {
        let path = self.endpoint.item_path(id);
        let text = self.send(Method::GET, &path, None, Some(id)).await?;
        self.decode_record(&text)
    }

    async fn create(&self, payload: &Record) -> Result<Record> {
        let text = self
            .send(Method::POST, &self.endpoint.collection, Some(payload), None)
            .await?;
        self.decode_record(&text)
    }

    async fn update(&self, id: &RecordId, payload: &Record) -> Result<Record> {
        let path = self.endpoint.item_path(id);
        let text = self
            .send(Method::PUT, &path, Some(payload), Some(id))
            .await?;
        self.decode_record(&text)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let path = self.endpoint.item_path(id);
        // 204 or any 2xx body (e.g. {"message": "..."}) counts as deleted
        self.send(Method::DELETE, &path, None, Some(id)).await?;
        Ok(())
    }

    async fn stats(&self) -> Result<Option<Record>> {
        let Some(path) = self.endpoint.stats.as_deref() else {
            return Ok(None);
        };
        let text = self.send(Method::GET, path, None, None).await?;
        self.decode_record(&text).map(Some)
    }
}
