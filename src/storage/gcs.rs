//! Google Cloud Storage over the JSON API
//!
//! Each [`store`](GcsObjectStore::store) call runs three phases:
//!
//! 1. **connect**: sign a service-account assertion (RS256) and exchange it at
//!    the key's `token_uri` for an OAuth2 access token
//! 2. **write**: media upload of the bytes to the bucket
//! 3. **close**: check the object resource the store returns against what was
//!    sent (name and size)
//!
//! Credentials are parsed per call, so a rotated key takes effect on the next
//! invocation without a restart.

use super::{ObjectAck, ObjectStore};
use crate::config::StorageConfig;
use crate::error::StoreError;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const STORAGE_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_write";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the assertion; Google caps it at one hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Fields of a service-account key file the relay needs
#[derive(Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default)]
    private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Object resource returned by a completed upload
#[derive(Deserialize)]
struct ObjectResource {
    name: String,
    /// Decimal string in the JSON API
    size: String,
    #[serde(default)]
    generation: Option<String>,
}

/// [`ObjectStore`] backed by a Google Cloud Storage bucket
#[derive(Clone)]
pub struct GcsObjectStore {
    http: reqwest::Client,
    bucket: String,
    endpoint: String,
    credentials_json: String,
    content_type: String,
}

impl std::fmt::Debug for GcsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsObjectStore")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

impl GcsObjectStore {
    /// Create a store for the configured bucket
    ///
    /// `content_type` is recorded on every uploaded object.
    pub fn new(http: reqwest::Client, config: &StorageConfig, content_type: &str) -> Self {
        Self {
            http,
            bucket: config.bucket.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            credentials_json: config.credentials_json.clone(),
            content_type: content_type.to_string(),
        }
    }

    /// Obtain an access token for the service account
    async fn connect(&self) -> Result<String, StoreError> {
        let key: ServiceAccountKey = serde_json::from_str(&self.credentials_json)
            .map_err(|e| StoreError::Connect(format!("invalid service account key: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: STORAGE_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| StoreError::Connect(format!("invalid private key: {e}")))?;
        let assertion = jsonwebtoken::encode(&header, &claims, &signing_key)
            .map_err(|e| StoreError::Connect(format!("failed to sign assertion: {e}")))?;

        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Connect(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Connect(format!(
                "token endpoint returned status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Connect(format!("unreadable token response: {e}")))?;
        Ok(token.access_token)
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&name={}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(path)
        )
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, bytes = data.len()))]
    async fn store(&self, path: &str, data: &[u8]) -> Result<ObjectAck, StoreError> {
        let token = self.connect().await?;
        tracing::debug!("obtained storage access token");

        let write_error = |reason: String| StoreError::Write {
            path: path.to_string(),
            reason,
        };
        let response = self
            .http
            .post(self.upload_url(path))
            .bearer_auth(&token)
            .header(reqwest::header::CONTENT_TYPE, &self.content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| write_error(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(write_error(format!("upload returned status {status}: {body}")));
        }

        let close_error = |reason: String| StoreError::Close {
            path: path.to_string(),
            reason,
        };
        let resource: ObjectResource = response
            .json()
            .await
            .map_err(|e| close_error(format!("unreadable object resource: {e}")))?;

        if resource.name != path {
            return Err(close_error(format!(
                "store committed {:?} instead",
                resource.name
            )));
        }
        let size: u64 = resource
            .size
            .parse()
            .map_err(|_| close_error(format!("invalid object size {:?}", resource.size)))?;
        if size != data.len() as u64 {
            return Err(close_error(format!(
                "store committed {size} bytes, sent {}",
                data.len()
            )));
        }

        Ok(ObjectAck {
            path: resource.name,
            size,
            generation: resource.generation,
        })
    }

    fn name(&self) -> &'static str {
        "gcs"
    }
}
