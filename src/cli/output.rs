//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::FrameError;

/// Map domain errors to a string for CLI output, with a hint for gate failures.
pub fn map_error(e: &FrameError) -> String {
    match e {
        FrameError::ConfigurationError(_) => format!(
            "{}\nhint: set SLOTHFRAME_AUTH_URL, or OPERATING_MODE=dev for the local override",
            e
        ),
        FrameError::TransportError(_) => {
            format!("{}\nhint: the verification endpoint may be down", e)
        }
        _ => e.to_string(),
    }
}
