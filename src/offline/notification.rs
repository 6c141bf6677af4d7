//! Push payloads and the notifications they turn into.

use serde::{Deserialize, Serialize};

use crate::config::NotificationConfig;

/// Action id that opens the app.
pub const VIEW_ACTION: &str = "view";
pub const DISMISS_ACTION: &str = "dismiss";

#[derive(Deserialize, Debug, Default)]
pub struct PushPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
    pub actions: Vec<NotificationAction>,
}

/// Title and options for a push payload, with defaults for whatever the
/// payload leaves out.
pub fn build_notification(payload: PushPayload, config: &NotificationConfig) -> (String, NotificationOptions) {
    // an empty string counts as missing
    let title = payload
        .title
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_title.clone());
    let options = NotificationOptions {
        body: payload
            .body
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| config.default_body.clone()),
        icon: config.icon.clone(),
        badge: config.badge.clone(),
        tag: config.tag.clone(),
        vibrate: config.vibrate.clone(),
        actions: vec![
            NotificationAction {
                action: VIEW_ACTION.to_string(),
                title: "View".to_string(),
                icon: Some("/icon-96x96.png".to_string()),
            },
            NotificationAction {
                action: DISMISS_ACTION.to_string(),
                title: "Dismiss".to_string(),
                icon: None,
            },
        ],
    };
    (title, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let (title, options) = build_notification(PushPayload::default(), &NotificationConfig::default());
        assert_eq!(title, "SkyTracker");
        assert_eq!(options.body, "Flight update available");
        assert_eq!(options.tag, "flight-update");
        assert_eq!(options.vibrate, vec![200, 100, 200]);
        assert_eq!(options.actions.len(), 2);
        assert_eq!(options.actions[0].action, VIEW_ACTION);
    }

    #[test]
    fn test_payload_overrides_title_and_body() {
        let payload: PushPayload =
            serde_json::from_str(r#"{"title":"LH441 delayed","body":"New departure 18:40"}"#).unwrap();
        let (title, options) = build_notification(payload, &NotificationConfig::default());
        assert_eq!(title, "LH441 delayed");
        assert_eq!(options.body, "New departure 18:40");
        assert_eq!(options.icon, "/icon-192x192.png");
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let payload: PushPayload = serde_json::from_str(r#"{"title":"","body":""}"#).unwrap();
        let (title, options) = build_notification(payload, &NotificationConfig::default());
        assert_eq!(title, "SkyTracker");
        assert_eq!(options.body, "Flight update available");
    }
}
