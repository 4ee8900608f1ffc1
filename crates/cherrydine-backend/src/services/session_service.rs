use cherrydine_bridge::notification::Severity;

/// Shown when the site cannot be reached at startup.
const SESSION_FAILED_MESSAGE: &str = "Не удалось подключиться к серверу. Проверьте соединение.";

/// Loads the cart page once so the cookie jar holds a CSRF token before the
/// first cart request. A failure is reported but does not stop the backend;
/// later requests surface their own errors.
pub async fn handle_session_priming(context: super::AppContextHandle) {
    match context.api.prime_session().await {
        Ok(()) => log::info!("Session primed"),
        Err(e) => {
            log::error!("Failed to prime session: {e}");
            context
                .send_notification(Severity::Danger, SESSION_FAILED_MESSAGE)
                .await;
        }
    }
}
