use crate::{ClientError, ClientResult};

use st_core::{
    DeviceIdentity, Record, RecordStore, RecordType, StoreResult, StoreSnapshot,
};

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use uuid::Uuid;

pub const DEVICE_ID_HEADER: &str = "X-Device-Id";

#[derive(Deserialize)]
struct RecordsResponse {
    records: Vec<Record>,
}

/// Remote record service reached over HTTP.
///
/// Every mutating call is an idempotent PUT keyed by record id, so callers
/// may repeat it freely after a transport failure.
pub struct RemoteRecordStore {
    pub base_url: String,
    pub device_id: DeviceIdentity,
    api_key: Option<String>,
    client: ReqwestClient,
}

impl RemoteRecordStore {
    /// # Arguments
    /// * `base_url` - Service URL (e.g., "https://sync.example.com")
    /// * `device_id` - Sent as `X-Device-Id` on every request
    /// * `api_key` - Optional bearer token
    /// * `timeout` - Whole-request timeout
    pub fn new(
        base_url: &str,
        device_id: DeviceIdentity,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> ClientResult<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::config(format!(
                "base_url must start with http:// or https://, got {base_url}"
            )));
        }

        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            device_id,
            api_key: api_key.map(String::from),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .request(method, &url)
            .header(DEVICE_ID_HEADER, self.device_id.to_string());

        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        req
    }

    /// Passes successful responses through, turns the rest into `Status` errors.
    async fn check(response: Response, record_id: Option<Uuid>) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::status(status.as_u16(), &body, record_id))
    }

    pub async fn list_records(&self, record_type: RecordType) -> ClientResult<Vec<Record>> {
        let path = format!("/v1/records?type={}", record_type.as_str());
        let response = self.request(Method::GET, &path).send().await?;
        let response = Self::check(response, None).await?;

        let body = response.text().await?;
        let parsed: RecordsResponse = serde_json::from_str(&body)?;

        let (matching, other): (Vec<Record>, Vec<Record>) = parsed
            .records
            .into_iter()
            .partition(|r| r.record_type == record_type);
        if !other.is_empty() {
            warn!(
                "Remote returned {} records not of type {record_type}; ignoring them",
                other.len()
            );
        }

        Ok(matching)
    }

    pub async fn put_record(&self, record: &Record) -> ClientResult<()> {
        let path = format!("/v1/records/{}", record.id);
        let response = self.request(Method::PUT, &path).json(record).send().await?;
        Self::check(response, Some(record.id)).await?;

        debug!("PUT {} ({}) accepted", record.id, record.record_type);
        Ok(())
    }

    pub async fn head_record(&self, id: Uuid) -> ClientResult<bool> {
        let path = format!("/v1/records/{id}");
        let response = self.request(Method::HEAD, &path).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(response, Some(id)).await?;
        Ok(true)
    }
}

#[async_trait]
impl RecordStore for RemoteRecordStore {
    fn label(&self) -> &str {
        "remote"
    }

    async fn fetch_all(&self, record_type: RecordType) -> StoreResult<StoreSnapshot> {
        let records = self.list_records(record_type).await?;
        Ok(StoreSnapshot::from_records(records))
    }

    async fn insert(&self, record: &Record) -> StoreResult<()> {
        Ok(self.put_record(record).await?)
    }

    async fn exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.head_record(id).await?)
    }
}
