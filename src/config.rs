//! Configuration types for submission-relay
//!
//! All settings come from the Lambda environment. They are read once at
//! startup into a [`Config`] that is handed to the relay and its clients, so
//! no collaborator looks at the environment on its own.
//!
//! | Variable                | Field                                  | Required |
//! |-------------------------|----------------------------------------|----------|
//! | `BUCKET`                | [`StorageConfig::bucket`]              | yes      |
//! | `GCP_CREDS_JSON`        | [`StorageConfig::credentials_json`]    | yes      |
//! | `GCS_ENDPOINT`          | [`StorageConfig::endpoint`]            | no       |
//! | `MAIL_TABLE`            | [`AuditConfig::table`]                 | yes      |
//! | `MAILGUN_DOMAIN`        | [`MailConfig::domain`]                 | yes      |
//! | `MAILGUN_PVT_API_KEY`   | [`MailConfig::api_key`]                | yes      |
//! | `MAILGUN_API_BASE`      | [`MailConfig::api_base`]               | no       |
//! | `SENDER`                | [`MailConfig::sender`]                 | yes      |
//! | `SUBJECT`               | [`MailConfig::subject`]                | yes      |
//! | `FETCH_TIMEOUT_SECS`    | [`FetchConfig::timeout`]               | no       |
//! | `EXPECTED_CONTENT_TYPE` | [`FetchConfig::expected_content_type`] | no       |

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Submission download settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Whole-request timeout for the download (default: 60s)
    #[serde(default = "default_fetch_timeout")]
    pub timeout: Duration,

    /// Media type the submission link must declare (default: "application/zip")
    #[serde(default = "default_content_type")]
    pub expected_content_type: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            expected_content_type: default_content_type(),
        }
    }
}

/// Object store (Google Cloud Storage) settings
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Destination bucket
    pub bucket: String,

    /// Service-account key file contents
    pub credentials_json: String,

    /// Storage API root (default: "https://storage.googleapis.com")
    #[serde(default = "default_gcs_endpoint")]
    pub endpoint: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            credentials_json: String::new(),
            endpoint: default_gcs_endpoint(),
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("credentials_json", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Status email (Mailgun) settings
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sending domain registered with Mailgun
    pub domain: String,

    /// Private API key
    pub api_key: String,

    /// API root (default: "https://api.mailgun.net", EU accounts use "https://api.eu.mailgun.net")
    #[serde(default = "default_mailgun_api_base")]
    pub api_base: String,

    /// `From` address
    pub sender: String,

    /// Subject line
    pub subject: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            api_key: String::new(),
            api_base: default_mailgun_api_base(),
            sender: String::new(),
            subject: String::new(),
        }
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("domain", &self.domain)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("sender", &self.sender)
            .field("subject", &self.subject)
            .finish()
    }
}

/// Audit table settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// DynamoDB table receiving one record per invocation
    pub table: String,
}

/// Main configuration for the relay
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Download settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Object store settings
    pub storage: StorageConfig,

    /// Email settings
    pub mail: MailConfig,

    /// Audit table settings
    pub audit: AuditConfig,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    ///
    /// Required variables that are missing or blank produce
    /// [`Error::Config`] naming the variable. The result is validated before
    /// it is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(Error::config(key, format!("{key} must be set"))),
            }
        };
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout = match optional("FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::config(
                        "FETCH_TIMEOUT_SECS",
                        format!("FETCH_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => default_fetch_timeout(),
        };

        let config = Self {
            fetch: FetchConfig {
                timeout,
                expected_content_type: optional("EXPECTED_CONTENT_TYPE")
                    .unwrap_or_else(default_content_type),
            },
            storage: StorageConfig {
                bucket: required("BUCKET")?,
                credentials_json: required("GCP_CREDS_JSON")?,
                endpoint: optional("GCS_ENDPOINT").unwrap_or_else(default_gcs_endpoint),
            },
            mail: MailConfig {
                domain: required("MAILGUN_DOMAIN")?,
                api_key: required("MAILGUN_PVT_API_KEY")?,
                api_base: optional("MAILGUN_API_BASE").unwrap_or_else(default_mailgun_api_base),
                sender: required("SENDER")?,
                subject: required("SUBJECT")?,
            },
            audit: AuditConfig {
                table: required("MAIL_TABLE")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values that can be judged without talking to any service
    pub fn validate(&self) -> Result<()> {
        if self.fetch.timeout.is_zero() {
            return Err(Error::config(
                "FETCH_TIMEOUT_SECS",
                "fetch timeout must be greater than zero",
            ));
        }
        if self.fetch.expected_content_type.trim().is_empty() {
            return Err(Error::config(
                "EXPECTED_CONTENT_TYPE",
                "expected content type must not be empty",
            ));
        }
        if self.storage.bucket.contains('/') {
            return Err(Error::config(
                "BUCKET",
                format!("bucket name {:?} must not contain '/'", self.storage.bucket),
            ));
        }
        check_url("GCS_ENDPOINT", &self.storage.endpoint)?;
        check_url("MAILGUN_API_BASE", &self.mail.api_base)?;
        Ok(())
    }

    /// Fully qualified location of an object in the configured bucket
    pub fn storage_uri(&self, path: &str) -> String {
        format!("gs://{}/{}", self.storage.bucket, path)
    }
}

fn check_url(key: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::config(key, format!("{key} is not a valid URL ({value:?}): {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config(
            key,
            format!("{key} must use http or https, got {other}"),
        )),
    }
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_content_type() -> String {
    "application/zip".to_string()
}

fn default_gcs_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_mailgun_api_base() -> String {
    "https://api.mailgun.net".to_string()
}
