use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::CmsError;
use crate::config::CmsConfig;
use crate::content::query::GroqQuery;
use crate::content::repository::ContentStore;
use crate::submissions::repository::{AssetId, DocumentId, SubmissionStore};

const TIMEOUT_SECONDS: u64 = 20;
const MAX_ERROR_BODY: usize = 512;

/// Sanity HTTP API client used for content reads, submission writes and
/// resume uploads.
#[derive(Clone)]
pub struct SanityClient {
    http: Client,
    base_url: Url,
    dataset: String,
    api_version: String,
    write_token: Option<String>,
}

impl std::fmt::Debug for SanityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityClient")
            .field("base_url", &self.base_url.as_str())
            .field("dataset", &self.dataset)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct MutationEnvelope {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AssetEnvelope {
    document: AssetDocument,
}

#[derive(Debug, Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

impl SanityClient {
    pub fn from_config(config: &CmsConfig) -> Result<Self, CmsError> {
        let project_id = config
            .project_id
            .as_deref()
            .ok_or(CmsError::NotConfigured)?;
        let base_url = Url::parse(&format!("https://{project_id}.api.sanity.io/"))
            .map_err(|_| CmsError::NotConfigured)?;
        Self::with_base_url(base_url, config)
    }

    /// Build a client against an explicit API root (used for local proxies).
    pub fn with_base_url(base_url: Url, config: &CmsConfig) -> Result<Self, CmsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            base_url,
            dataset: config.dataset.clone(),
            api_version: config.api_version.clone(),
            write_token: config.write_token.clone(),
        })
    }

    fn endpoint(&self, kind: &str) -> Result<Url, CmsError> {
        let path = format!("v{}/{kind}/{}", self.api_version, self.dataset);
        self.base_url
            .join(&path)
            .map_err(|err| CmsError::Decode(format!("invalid endpoint {path}: {err}")))
    }

    fn write_token(&self) -> Result<&str, CmsError> {
        self.write_token
            .as_deref()
            .ok_or(CmsError::MissingWriteToken)
    }

    async fn check_status(response: Response) -> Result<Response, CmsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CmsError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }
        Err(CmsError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

/// Encode GROQ parameters the way the query endpoint expects: `$name=<json>`.
pub(crate) fn encode_params(url: &mut Url, query: &GroqQuery) {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("query", &query.text);
    for (name, value) in &query.params {
        pairs.append_pair(&format!("${name}"), &value.to_string());
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch(&self, query: &GroqQuery) -> Result<Value, CmsError> {
        let mut url = self.endpoint("data/query")?;
        encode_params(&mut url, query);
        debug!(dataset = %self.dataset, "issuing content query");

        let response = self.http.get(url).send().await?;
        let envelope: QueryEnvelope = Self::check_status(response).await?.json().await?;
        Ok(envelope.result)
    }
}

#[async_trait]
impl SubmissionStore for SanityClient {
    fn can_write(&self) -> bool {
        self.write_token.is_some()
    }

    async fn create_document(&self, document: Value) -> Result<DocumentId, CmsError> {
        let token = self.write_token()?;
        let mut url = self.endpoint("data/mutate")?;
        url.query_pairs_mut().append_pair("returnIds", "true");

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&json!({ "mutations": [{ "create": document }] }))
            .send()
            .await?;

        let envelope: MutationEnvelope = Self::check_status(response).await?.json().await?;
        envelope
            .results
            .into_iter()
            .next()
            .map(|result| DocumentId(result.id))
            .ok_or_else(|| CmsError::Decode("mutation returned no document id".to_string()))
    }

    async fn upload_file(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<AssetId, CmsError> {
        let token = self.write_token()?;
        let mut url = self.endpoint("assets/files")?;
        url.query_pairs_mut().append_pair("filename", file_name);

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let response = Self::check_status(response).await.inspect_err(|err| {
            warn!(error = %err, file_name, "asset upload rejected");
        })?;
        let envelope: AssetEnvelope = response.json().await?;
        Ok(AssetId(envelope.document.id))
    }
}
