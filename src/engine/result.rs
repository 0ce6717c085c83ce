// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

/// Outcome of processing one sample.
///
/// The status fields are shared by every specialization; `payload` carries the
/// domain data (echoed inputs plus computed output series). A worker creates
/// the result when it picks up a sample, fills it in while the solver runs and
/// hands it to the processor, after which it is never modified again.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult<P> {
    pub succeeded: bool,
    pub error_message: Option<String>,
    /// Wall-clock seconds spent on the sample, NaN when unknown.
    pub elapsed_time: f64,
    pub payload: P,
}

impl<P> SimulationResult<P> {
    /// Fresh, not yet successful result around an initialized payload.
    pub fn pending(payload: P) -> Self {
        Self {
            succeeded: false,
            error_message: None,
            elapsed_time: f64::NAN,
            payload,
        }
    }

    pub fn has_finite_elapsed_time(&self) -> bool {
        self.elapsed_time.is_finite()
    }
}

impl<P: Default> SimulationResult<P> {
    /// Failed result with an empty payload.
    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error_message: Some(error_message.into()),
            elapsed_time: f64::NAN,
            payload: P::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_result_is_not_successful_and_has_no_timing() {
        let result = SimulationResult::pending(vec![1.0, 2.0]);
        assert!(!result.succeeded);
        assert!(result.error_message.is_none());
        assert!(!result.has_finite_elapsed_time());
        assert_eq!(result.payload, vec![1.0, 2.0]);
    }

    #[test]
    fn failed_result_carries_message_and_default_payload() {
        let result: SimulationResult<Vec<f64>> = SimulationResult::failed("boom");
        assert!(!result.succeeded);
        assert_eq!(result.error_message.as_deref(), Some("boom"));
        assert!(result.payload.is_empty());
        assert!(result.elapsed_time.is_nan());
    }
}
