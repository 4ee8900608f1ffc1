/// Severity of a user-visible notification.
///
/// The restaurant pages only distinguish between positive feedback and
/// failures, which map to the `success` and `danger` alert styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Indicates a successful operation or positive outcome.
    Success,
    /// Indicates an error or failure of the operation the user triggered.
    Danger,
}

impl Severity {
    /// Name of the alert style this severity renders with.
    pub fn style(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

/// A notification payload intended for the user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// The severity of the notification, determining its visual style.
    pub severity: Severity,
    /// The text content to display to the user.
    pub message: String,
}
