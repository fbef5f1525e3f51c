//! One-time validation of the configured model against the OpenAI API.
//!
//! The result is held by [`ModelGate`] for the lifetime of a session, so a
//! run that generates harnesses more than once only pays for one request.

use anyhow::{bail, Context, Result};
use serde_json::json;

use ofgo_core::Settings;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    /// Skipping was requested through settings or `SKIP_MODEL_CHECK`.
    Skipped,
    Pending,
    Validated,
}

/// Cached model-validation state.
#[derive(Debug, Clone)]
pub struct ModelGate {
    state: GateState,
}

impl ModelGate {
    pub fn from_settings(settings: &Settings) -> Self {
        let state = if settings.skip_model_check {
            GateState::Skipped
        } else {
            GateState::Pending
        };
        Self { state }
    }

    pub fn is_open(&self) -> bool {
        self.state != GateState::Pending
    }

    /// Validate `settings.model` unless already done or skipped.
    pub fn ensure(&mut self, settings: &Settings) -> Result<()> {
        self.ensure_with(|| request_test_response(settings))
    }

    /// Like [`ModelGate::ensure`] with an injectable check.
    pub fn ensure_with(&mut self, check: impl FnOnce() -> Result<()>) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        check()?;
        self.state = GateState::Validated;
        Ok(())
    }
}

/// Send a minimal request with the configured model. Costs a few tokens.
fn request_test_response(settings: &Settings) -> Result<()> {
    let Some(key) = settings.openai_api_key.as_deref() else {
        bail!(
            "missing OpenAI API key; export it with\n    export OPENAI_API_KEY=<your_api_key>"
        );
    };
    tracing::info!("validating model '{}'", settings.model);
    let body = json!({
        "model": settings.model,
        "input": "test",
        "max_output_tokens": 16,
        "temperature": settings.temperature,
    });
    match ureq::post(RESPONSES_URL)
        .set("Authorization", &format!("Bearer {key}"))
        .send_json(body)
    {
        Ok(_) => Ok(()),
        Err(ureq::Error::Status(code, response)) => {
            let detail = response.into_string().unwrap_or_default();
            bail!("failed to generate test response (HTTP {code}): {detail}")
        }
        Err(e) => Err(e).context("failed to reach the OpenAI API"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn skip_setting_opens_gate_without_checking() {
        let settings = Settings {
            skip_model_check: true,
            ..Settings::default()
        };
        let mut gate = ModelGate::from_settings(&settings);
        assert!(gate.is_open());
        gate.ensure_with(|| panic!("check must not run")).unwrap();
    }

    #[test]
    fn successful_check_is_cached() {
        let mut gate = ModelGate::from_settings(&Settings::default());
        let calls = Cell::new(0);
        for _ in 0..3 {
            gate.ensure_with(|| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap();
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failed_check_is_retried_next_time() {
        let mut gate = ModelGate::from_settings(&Settings::default());
        assert!(gate.ensure_with(|| bail!("rejected")).is_err());
        assert!(!gate.is_open());
        gate.ensure_with(|| Ok(())).unwrap();
        assert!(gate.is_open());
    }

    #[test]
    fn missing_key_is_reported_before_any_request() {
        let mut gate = ModelGate::from_settings(&Settings::default());
        let err = gate.ensure(&Settings::default()).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
