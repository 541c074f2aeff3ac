//! Authorization Gate
//!
//! A frame starts `Locked` and becomes `Unlocked` after one successful
//! authorization. `Unlocked` is absorbing. The operating mode is re-read from
//! its signal on every attempt, so two attempts on the same frame may run in
//! different modes.
//!
//! Development mode compares the credential digest against a digest embedded
//! at build time and never contacts the network. That override is a
//! deliberate bypass of the production authority and is always logged at
//! `warn` when it is taken.

use crate::config::SlothConfig;
use crate::error::FrameError;
use crate::hasher::{digest, TokenDigest};
use crate::verification::{HttpVerificationClient, VerificationContext, VerificationService};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Environment variable selecting the operating mode.
pub const OPERATING_MODE_ENV: &str = "OPERATING_MODE";

/// Digest of the development override credential:
/// `2733a2fe052e8d6395e2118ea70df4bf4fbdee1afad383a030e42a336b55d480`.
#[rustfmt::skip]
pub const DEV_OVERRIDE_DIGEST: TokenDigest = TokenDigest::from_bytes([
    0x27, 0x33, 0xa2, 0xfe, 0x05, 0x2e, 0x8d, 0x63,
    0x95, 0xe2, 0x11, 0x8e, 0xa7, 0x0d, 0xf4, 0xbf,
    0x4f, 0xbd, 0xee, 0x1a, 0xfa, 0xd3, 0x83, 0xa0,
    0x30, 0xe4, 0x2a, 0x33, 0x6b, 0x55, 0xd4, 0x80,
]);

/// Execution gate state of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Locked,
    Unlocked,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Locked => f.write_str("Safe Locked"),
            GateState::Unlocked => f.write_str("Unlocked"),
        }
    }
}

/// Operating mode resolved for a single unlock attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatingMode {
    Production,
    Development,
    /// Carries the lowercased signal value that was not recognised.
    Unrecognized(String),
}

impl OperatingMode {
    /// Resolve from a raw signal value. Absent means production.
    pub fn resolve(signal: Option<&str>) -> Self {
        let value = signal.unwrap_or("prod").to_lowercase();
        match value.as_str() {
            "prod" => OperatingMode::Production,
            "dev" => OperatingMode::Development,
            _ => OperatingMode::Unrecognized(value),
        }
    }
}

/// Where the operating mode signal is read from.
#[derive(Debug, Clone)]
pub enum ModeSignal {
    /// Read `OPERATING_MODE` from the process environment on every attempt.
    Environment,
    /// A pinned value; `None` behaves like an unset variable.
    Fixed(Option<String>),
}

impl ModeSignal {
    pub fn read(&self) -> Option<String> {
        match self {
            ModeSignal::Environment => std::env::var(OPERATING_MODE_ENV).ok(),
            ModeSignal::Fixed(value) => value.clone(),
        }
    }

    pub fn resolve(&self) -> OperatingMode {
        OperatingMode::resolve(self.read().as_deref())
    }
}

/// Process-level collaborators the gate consults: the verification service,
/// the mode signal and the development reference digest.
///
/// Immutable once built; frames share it behind an `Arc`.
pub struct Authority {
    verifier: Arc<dyn VerificationService>,
    mode_signal: ModeSignal,
    dev_reference: TokenDigest,
}

impl Authority {
    pub fn new(verifier: Arc<dyn VerificationService>) -> Self {
        Self {
            verifier,
            mode_signal: ModeSignal::Environment,
            dev_reference: DEV_OVERRIDE_DIGEST,
        }
    }

    /// Build an authority backed by the HTTP verification client.
    pub fn from_config(config: &SlothConfig) -> Result<Self, FrameError> {
        let client = HttpVerificationClient::new(&config.verification)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn with_mode_signal(mut self, signal: ModeSignal) -> Self {
        self.mode_signal = signal;
        self
    }

    pub fn with_dev_reference(mut self, reference: TokenDigest) -> Self {
        self.dev_reference = reference;
        self
    }

    /// Run one full authorization attempt. `Ok` means the credential is accepted.
    pub async fn authorize(&self, token: &str) -> Result<OperatingMode, FrameError> {
        let token_digest = digest(token);
        let mode = self.mode_signal.resolve();
        debug!(mode = ?mode, token = %token_digest.short(), "Authorization attempt");

        match &mode {
            OperatingMode::Production => {
                self.verifier
                    .verify(&token_digest, &VerificationContext::now())
                    .await
                    .into_result()?;
            }
            OperatingMode::Development => {
                if !token_digest.matches(&self.dev_reference) {
                    error!("Invalid dev override token. Access denied.");
                    return Err(FrameError::InvalidDevCredential);
                }
                warn!("Environment is DEV. Local override accepted. Execution unlocked.");
            }
            OperatingMode::Unrecognized(value) => {
                error!(environment = %value, "Unknown environment. Remaining in locked state.");
                return Err(FrameError::UnknownEnvironment(value.clone()));
            }
        }

        Ok(mode)
    }
}

/// The Locked/Unlocked state machine owned by each frame.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    state: GateState,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Locked,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Attempt the Locked to Unlocked transition.
    ///
    /// Once unlocked this returns `Ok` without consulting the authority again.
    /// On failure the gate stays locked and the error is returned.
    pub async fn unlock(&mut self, authority: &Authority, token: &str) -> Result<(), FrameError> {
        if self.is_unlocked() {
            debug!("Gate already unlocked");
            return Ok(());
        }

        let mode = authority.authorize(token).await?;
        self.state = GateState::Unlocked;
        info!(mode = ?mode, "Execution gate unlocked");
        Ok(())
    }
}
