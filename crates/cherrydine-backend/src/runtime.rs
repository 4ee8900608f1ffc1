//! Backend runtime setup and orchestration.
//!
//! This module wires together the cart API client and the message dispatch
//! loop that listens to frontend bridge requests.

use std::{sync::Arc, thread};

use cherrydine_bridge::{MessageFromBackend, MessageToBackend, config::Config};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::{
    api::{ApiError, HttpCartApi},
    app::AppContext,
    services,
};

/// Prime the session and start processing frontend messages.
async fn setup_backend(
    api: HttpCartApi,
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) {
    let context = Arc::new(AppContext {
        api: Arc::new(api),
        tx,
    });

    tokio::spawn(services::session_service::handle_session_priming(
        context.clone(),
    ));
    context.consume_bridge_messages(rx).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// The HTTP client is built before the thread starts so an unusable
/// configuration is reported to the caller instead of killing the thread.
pub fn run(
    config: &Config,
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> Result<thread::JoinHandle<()>, ApiError> {
    let api = HttpCartApi::new(&config.base_url, config.session_id.as_deref())?;
    log::info!("Backend talks to {}", config.base_url);

    Ok(thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        runtime.block_on(async { setup_backend(api, rx, tx).await });
    }))
}
