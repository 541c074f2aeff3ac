//! Verification Service Client
//!
//! Sends a credential digest to the remote verification authority and classifies
//! the answer. The client never retries; a failed call is reported to the gate as-is.

use crate::error::FrameError;
use crate::hasher::TokenDigest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info, warn};

/// Client identifier sent with every verification request.
pub const CLIENT_ID: &str = "sloth_frame_v1";

const USER_AGENT: &str = "SlothFrame/1.0";

/// Environment variable holding the verification endpoint address.
pub const AUTH_URL_ENV: &str = "SLOTHFRAME_AUTH_URL";

/// Older name for [`AUTH_URL_ENV`], read only when the new one is unset or blank.
pub const LEGACY_AUTH_URL_ENV: &str = "SLOTHDEV_AUTH_URL";

/// Endpoint named by the environment, if any. Blank values count as unset.
pub fn endpoint_from_env() -> Option<String> {
    [AUTH_URL_ENV, LEGACY_AUTH_URL_ENV]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Verification endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Endpoint URL; production unlocks fail with a configuration error when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_client_id")]
    pub client_id: String,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_client_id() -> String {
    CLIENT_ID.to_string()
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            client_id: default_client_id(),
        }
    }
}

impl VerificationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("Verification timeout must be greater than zero".to_string());
        }
        if self.client_id.trim().is_empty() {
            return Err("Verification client_id cannot be empty".to_string());
        }
        Ok(())
    }

    /// Treat a blank endpoint as no endpoint at all.
    pub fn normalize(&mut self) {
        if self.endpoint.as_deref().is_some_and(|e| e.trim().is_empty()) {
            self.endpoint = None;
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Request metadata sent alongside the digest.
#[derive(Debug, Clone)]
pub struct VerificationContext {
    pub timestamp: DateTime<Utc>,
}

impl VerificationContext {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
        }
    }

    /// Unix time in fractional seconds.
    pub fn unix_seconds(&self) -> f64 {
        self.timestamp.timestamp_millis() as f64 / 1000.0
    }
}

/// Why the authority could not be consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreachableReason {
    /// No endpoint configured; no connection was attempted.
    NotConfigured,
    /// Connection, timeout or other transport failure.
    Transport(String),
}

/// Outcome of a verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Affirmed,
    Rejected { status: u16 },
    Unreachable(UnreachableReason),
}

impl Verdict {
    /// Convert a non-affirmative verdict into the matching gate error.
    pub fn into_result(self) -> Result<(), FrameError> {
        match self {
            Verdict::Affirmed => Ok(()),
            Verdict::Rejected { status } => Err(FrameError::RejectedCredential { status }),
            Verdict::Unreachable(UnreachableReason::NotConfigured) => {
                Err(FrameError::ConfigurationError(format!(
                    "production mode requires a verification endpoint ({} or verification.endpoint)",
                    AUTH_URL_ENV
                )))
            }
            Verdict::Unreachable(UnreachableReason::Transport(reason)) => {
                Err(FrameError::TransportError(reason))
            }
        }
    }
}

/// A remote authority able to vouch for a credential digest.
#[async_trait]
pub trait VerificationService: Send + Sync {
    async fn verify(&self, digest: &TokenDigest, context: &VerificationContext) -> Verdict;
}

#[derive(Serialize)]
struct VerificationRequest<'a> {
    client_id: &'a str,
    token_hash: String,
    timestamp: f64,
}

/// HTTP client for the verification authority
pub struct HttpVerificationClient {
    client: Client,
    endpoint: Option<String>,
    client_id: String,
}

impl HttpVerificationClient {
    pub fn new(config: &VerificationConfig) -> Result<Self, FrameError> {
        let client = Client::builder()
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(|e| FrameError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone().filter(|e| !e.trim().is_empty()),
            client_id: config.client_id.clone(),
        })
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("Request timeout: {}", error)
    } else if error.is_connect() {
        format!("Connection error: {}", error)
    } else {
        format!("HTTP error: {}", error)
    }
}

#[async_trait]
impl VerificationService for HttpVerificationClient {
    async fn verify(&self, digest: &TokenDigest, context: &VerificationContext) -> Verdict {
        let Some(endpoint) = self.endpoint.as_deref() else {
            error!("Production mode requires {} to be configured", AUTH_URL_ENV);
            error!("Execution locked. Configure the verification endpoint or switch to dev mode.");
            return Verdict::Unreachable(UnreachableReason::NotConfigured);
        };

        info!(endpoint = %endpoint, token = %digest.short(), "Authenticating against verification endpoint");

        let request = VerificationRequest {
            client_id: &self.client_id,
            token_hash: digest.to_hex(),
            timestamp: context.unix_seconds(),
        };

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .json(&request)
            .send()
            .await;

        match response {
            Ok(response) if response.status().as_u16() == 200 => {
                info!("Identity verified by verification endpoint");
                Verdict::Affirmed
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!(status, "Verification endpoint rejected token");
                Verdict::Rejected { status }
            }
            Err(e) => {
                let reason = describe_transport_error(&e);
                error!(error = %reason, "Failed to reach verification endpoint");
                info!("If you are running locally, set OPERATING_MODE=dev to use the local override");
                Verdict::Unreachable(UnreachableReason::Transport(reason))
            }
        }
    }
}
