use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use models::page::Page;

use crate::auth::AuthStore;
use crate::error::{ApiError, ErrorBody};

/// Thin wrapper over the backend's generic record endpoints
/// (`/api/collections/{name}/records`). Query semantics, storage, and auth
/// token issuance live on the backend; this only shapes requests.
pub struct RecordService {
    http: reqwest::Client,
    base_url: String,
    auth: Arc<AuthStore>,
}

impl RecordService {
    pub fn new(base_url: impl Into<String>, auth: Arc<AuthStore>) -> Arc<Self> {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Arc::new(Self { http: reqwest::Client::new(), base_url, auth })
    }

    fn records_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{}/records", self.base_url, collection)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, url);
        if let Some(token) = self.auth.token() {
            req = req.bearer_auth(token);
        }
        req
    }

    /// One page of records, optionally filtered/sorted.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        collection: &str,
        page: u32,
        per_page: u32,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Page<T>, ApiError> {
        let mut query: Vec<(&str, String)> =
            vec![("page", page.to_string()), ("perPage", per_page.to_string())];
        if let Some(f) = filter {
            query.push(("filter", f.to_string()));
        }
        if let Some(s) = sort {
            query.push(("sort", s.to_string()));
        }
        debug!(collection, page, per_page, "get_list");
        let resp = self
            .request(reqwest::Method::GET, &self.records_url(collection))
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    /// Every record, fetched page by page. Used for small collections
    /// (roles, skills, service-songs of one service).
    pub async fn get_full_list<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let batch: Page<T> = self.get_list(collection, page, 200, filter, sort).await?;
            let last = batch.page >= batch.total_pages;
            items.extend(batch.items);
            if last {
                break;
            }
            page += 1;
        }
        Ok(items)
    }

    pub async fn get_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.records_url(collection), id);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let resp = self
            .request(reqwest::Method::POST, &self.records_url(collection))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.records_url(collection), id);
        let resp = self
            .request(reqwest::Method::PATCH, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.records_url(collection), id);
        let resp = self
            .request(reqwest::Method::DELETE, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        expect_success(resp).await.map(|_| ())
    }

    /// GET a non-collection endpoint returning JSON (status probe, analytics).
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    /// POST a non-collection endpoint returning JSON.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode(resp).await
    }

    /// GET raw bytes (CSV exports). Download mechanics are the caller's.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let resp = expect_success(resp).await?;
        let bytes = resp.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body: ErrorBody = resp.json().await.unwrap_or_default();
    Err(ApiError::Status { code: status.as_u16(), body })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let resp = expect_success(resp).await?;
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}
