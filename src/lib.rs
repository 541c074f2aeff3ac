//! SlothFrame: lazy tabular frames behind a credential-gated execution engine.
//!
//! A [`frame::Frame`] queues filter and select operations without running them.
//! The plan can be costed at any time; rows are only materialized on export,
//! and only after the frame's gate has been unlocked with a credential that the
//! verification authority (or, in development mode, the embedded override
//! digest) accepts.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimate;
pub mod export;
pub mod frame;
pub mod gate;
pub mod hasher;
pub mod logging;
pub mod plan;
pub mod types;
pub mod verification;

pub use error::FrameError;
pub use frame::Frame;
pub use gate::{Authority, GateState, ModeSignal, OperatingMode};
pub use types::Row;
