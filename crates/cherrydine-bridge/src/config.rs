use serde::{Deserialize, Serialize};

/// Tuning of the on-screen notification stack.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Maximum number of notifications visible at the same time. Further
    /// notifications wait in a queue until a slot frees up.
    pub max_visible: usize,
    /// How long a notification stays on screen before it dismisses itself, in
    /// milliseconds.
    pub auto_dismiss_ms: u64,
    /// Duration of the fade-out between a dismissal and the removal of the
    /// notification, in milliseconds.
    pub fade_out_ms: u64,
    /// Playback volume of the notification cue, in range `[0.0, 1.0]`.
    pub sound_volume: f32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            max_visible: 3,
            auto_dismiss_ms: 5000,
            fade_out_ms: 150,
            sound_volume: 0.125,
        }
    }
}

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the restaurant site, cart endpoints are resolved against it.
    pub base_url: String,
    /// Session cookie of an already logged in user, if any. Login itself is
    /// handled by the site.
    pub session_id: Option<String>,
    /// Capacity of each direction of the frontend/backend bridge.
    pub bridge_buffer: usize,
    /// Configuration of the notification stack.
    pub notifications: NotificationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            session_id: None,
            bridge_buffer: 64,
            notifications: NotificationConfig::default(),
        }
    }
}
