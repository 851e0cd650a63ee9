//! Service-layer outcome envelope.
//!
//! # Invariants
//! - `is_success()` is true iff no error message was recorded.
//! - Messages keep insertion order and are plain, pre-formatted strings.
//! - A panel is attached only by successful create/update.

use crate::model::solar_panel::SolarPanel;
use serde::Serialize;

/// Category of a business-rule failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultKind {
    /// Caller-supplied data violates a rule.
    Invalid,
    /// Referenced id does not exist.
    NotFound,
}

impl ResultKind {
    /// HTTP-style status a front end would answer with.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Invalid => 400,
            Self::NotFound => 404,
        }
    }
}

/// One recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub message: String,
    pub kind: ResultKind,
}

/// Outcome of a service mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelResult {
    errors: Vec<ErrorMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    panel: Option<SolarPanel>,
}

impl PanelResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records a failure; format arguments into `message` before calling.
    pub fn add_error(&mut self, message: impl Into<String>, kind: ResultKind) {
        self.errors.push(ErrorMessage {
            message: message.into(),
            kind,
        });
    }

    pub fn errors(&self) -> &[ErrorMessage] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(|error| error.message.as_str())
            .collect()
    }

    /// Failure category for response mapping; `NotFound` wins over `Invalid`.
    ///
    /// Returns `None` on success.
    pub fn kind(&self) -> Option<ResultKind> {
        if self
            .errors
            .iter()
            .any(|error| error.kind == ResultKind::NotFound)
        {
            return Some(ResultKind::NotFound);
        }
        self.errors.first().map(|error| error.kind)
    }

    /// 200 on success, otherwise the status of `kind()`.
    pub fn status_code(&self) -> u16 {
        self.kind().map_or(200, ResultKind::status_code)
    }

    pub fn panel(&self) -> Option<&SolarPanel> {
        self.panel.as_ref()
    }

    pub fn into_panel(self) -> Option<SolarPanel> {
        self.panel
    }

    pub(crate) fn set_panel(&mut self, panel: SolarPanel) {
        self.panel = Some(panel);
    }
}
