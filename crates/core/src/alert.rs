//! Alert rules embedded in dashboard bodies.
//!
//! Alerts live on panels (`panels[].alert`), on panels nested in collapsed
//! rows (`panels[].panels[].alert`) and, for legacy bodies, on row panels
//! (`rows[].panels[].alert`). [`extract_alerts`] validates every definition
//! before a save and produces the rules the [`AlertSync`] collaborator
//! reconciles after the commit.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::dashboard::Dashboard;
use crate::types::{BoxError, DbId};

/// Evaluation interval used when an alert does not declare one.
pub const DEFAULT_ALERT_FREQUENCY_SECS: i64 = 60;

/// One alert rule extracted from a dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRule {
    pub panel_id: i64,
    pub name: String,
    pub message: String,
    pub frequency_secs: i64,
    /// The raw alert definition as stored on the panel.
    pub settings: Value,
}

/// Why an embedded alert definition was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AlertError {
    #[error("Panel id is missing or not a positive integer")]
    InvalidPanelId,

    #[error("Alert on panel {panel_id} has no name")]
    MissingName { panel_id: i64 },

    #[error("Alert on panel {panel_id} has invalid frequency '{value}'")]
    InvalidFrequency { panel_id: i64, value: String },

    #[error("Alert on panel {panel_id} has no conditions")]
    MissingConditions { panel_id: i64 },
}

/// Synchronizes the alert rules of a committed dashboard with the alerting
/// subsystem. Runs only after a successful commit.
#[async_trait]
pub trait AlertSync: Send + Sync {
    async fn reconcile(
        &self,
        org_id: DbId,
        user_id: DbId,
        dashboard: &Dashboard,
    ) -> Result<(), BoxError>;
}

/// Extract and validate every alert definition in a dashboard body.
pub fn extract_alerts(data: &Map<String, Value>) -> Result<Vec<AlertRule>, AlertError> {
    let mut rules = Vec::new();
    for panel in collect_panels(data) {
        if let Some(alert) = panel.get("alert").filter(|a| !a.is_null()) {
            rules.push(parse_alert(panel, alert)?);
        }
    }
    Ok(rules)
}

fn collect_panels(data: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    let mut panels = Vec::new();

    for panel in objects(data.get("panels")) {
        panels.push(panel);
        // Collapsed rows keep their children inline.
        panels.extend(objects(panel.get("panels")));
    }
    for row in objects(data.get("rows")) {
        panels.extend(objects(row.get("panels")));
    }

    panels
}

fn objects(value: Option<&Value>) -> impl Iterator<Item = &Map<String, Value>> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn parse_alert(panel: &Map<String, Value>, alert: &Value) -> Result<AlertRule, AlertError> {
    let panel_id = panel
        .get("id")
        .and_then(Value::as_i64)
        .filter(|id| *id > 0)
        .ok_or(AlertError::InvalidPanelId)?;

    let name = alert
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(AlertError::MissingName { panel_id })?
        .to_string();

    let frequency_secs = match alert.get("frequency") {
        None | Some(Value::Null) => DEFAULT_ALERT_FREQUENCY_SECS,
        Some(value) => parse_frequency(value).ok_or_else(|| AlertError::InvalidFrequency {
            panel_id,
            value: value.to_string(),
        })?,
    };

    let has_conditions = alert
        .get("conditions")
        .and_then(Value::as_array)
        .is_some_and(|conditions| !conditions.is_empty());
    if !has_conditions {
        return Err(AlertError::MissingConditions { panel_id });
    }

    let message = alert
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(AlertRule {
        panel_id,
        name,
        message,
        frequency_secs,
        settings: alert.clone(),
    })
}

/// Parse `"30s"`, `"5m"`, `"1h"`, `"1d"`, a bare `"90"` or the integer `90`
/// into seconds. Zero and negative intervals are rejected.
fn parse_frequency(value: &Value) -> Option<i64> {
    let secs = match value {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => {
            let s = s.trim();
            let (digits, unit) = match s.char_indices().last()? {
                (idx, c) if c.is_ascii_alphabetic() => (&s[..idx], c),
                _ => (s, 's'),
            };
            let amount: i64 = digits.parse().ok()?;
            let multiplier = match unit {
                's' => 1,
                'm' => 60,
                'h' => 3_600,
                'd' => 86_400,
                _ => return None,
            };
            amount.checked_mul(multiplier)?
        }
        _ => return None,
    };
    (secs > 0).then_some(secs)
}
