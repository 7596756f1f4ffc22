//! Reqwest adapters for the collaborator traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{DocumentType, PackageVerdict};

use super::{
    ComparatorError, ExtractionError, FieldExtractor, GoodsComparator, GoodsMatch,
    MatchStrictness, StoreError, VerdictStore,
};

fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .expect("Failed to create HTTP client")
}

/// HTTP client for the field-extraction service.
pub struct HttpFieldExtractor {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ExtractRequest<'a> {
    document_type: &'a str,
    text: &'a str,
}

impl HttpFieldExtractor {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout_secs),
            timeout_secs,
        }
    }
}

#[async_trait]
impl FieldExtractor for HttpFieldExtractor {
    async fn extract(
        &self,
        doc_type: DocumentType,
        text: &str,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}/extract", self.base_url);
        let body = ExtractRequest {
            document_type: doc_type.as_str(),
            text,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionError::Timeout(self.timeout_secs)
            } else {
                ExtractionError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

/// HTTP client for the semantic goods-description comparator.
pub struct HttpGoodsComparator {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct CompareRequest<'a> {
    reference_description: &'a str,
    candidate_description: &'a str,
    strictness: &'a str,
}

#[derive(Deserialize)]
struct CompareResponse {
    matches: bool,
    reason: String,
}

impl HttpGoodsComparator {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout_secs),
            timeout_secs,
        }
    }
}

#[async_trait]
impl GoodsComparator for HttpGoodsComparator {
    async fn compare(
        &self,
        reference: &str,
        candidate: &str,
        strictness: MatchStrictness,
    ) -> Result<GoodsMatch, ComparatorError> {
        let url = format!("{}/compare", self.base_url);
        let body = CompareRequest {
            reference_description: reference,
            candidate_description: candidate,
            strictness: strictness.as_str(),
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ComparatorError::Timeout(self.timeout_secs)
            } else {
                ComparatorError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ComparatorError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(ComparatorError::Service {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: CompareResponse = serde_json::from_str(&text)
            .map_err(|e| ComparatorError::Malformed(e.to_string()))?;
        Ok(GoodsMatch {
            matches: parsed.matches,
            reason: parsed.reason,
        })
    }
}

/// HTTP client for the verdict persistence service.
pub struct HttpVerdictStore {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct StoreRequest<'a> {
    verdict: &'a PackageVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary_embedding: Option<&'a [f32]>,
}

impl HttpVerdictStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(timeout_secs),
        }
    }
}

#[async_trait]
impl VerdictStore for HttpVerdictStore {
    async fn store(
        &self,
        verdict: &PackageVerdict,
        summary_embedding: Option<&[f32]>,
    ) -> Result<(), StoreError> {
        let url = format!("{}/packages", self.base_url);
        let body = StoreRequest {
            verdict,
            summary_embedding,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Service {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
