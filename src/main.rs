use std::{io::BufRead, thread};

use cherrydine_audio::OutputCuePlayer;
use cherrydine_bridge::BridgeChannels;
use cherrydine_frontend::{
    App, BackendBridge,
    entities::add_to_cart_entity::CartCounter,
    input::UserIntent,
    notifications::NotificationCenter,
    storage::PreferenceStore,
    surface::TerminalSurface,
};
use clap::error::ErrorKind;
use tokio::sync::mpsc;

fn main() -> anyhow::Result<()> {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let config = cherrydine_backend::load_config().await?;

    let channels = BridgeChannels::new(config.bridge_buffer.max(1));
    cherrydine_backend::run(&config, channels.backend_rx, channels.backend_tx)?;

    let (notifications, timers) = NotificationCenter::initialize(
        config.notifications.clone(),
        PreferenceStore::default_location()?,
        Box::new(OutputCuePlayer::new(config.notifications.sound_volume)),
        Box::new(TerminalSurface::stdout()),
    )
    .await;
    let bridge = BackendBridge {
        to_backend: channels.frontend_tx,
    };
    let app = App::new(
        notifications,
        bridge,
        CartCounter::rendered(0),
        Box::new(TerminalSurface::stdout()),
    );

    let (intent_tx, intent_rx) = mpsc::unbounded_channel();
    thread::spawn(move || read_intents(intent_tx));

    cherrydine_frontend::run(app, timers, channels.frontend_rx, intent_rx).await
}

/// Forwards commands typed on stdin until it closes or the frontend stops.
fn read_intents(tx: mpsc::UnboundedSender<UserIntent>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read from stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<UserIntent>() {
            Ok(intent) => {
                if tx.send(intent).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                if let Err(e) = e.print() {
                    log::error!("Failed to print help: {e}");
                }
            }
            Err(e) => log::warn!("{}", e.render()),
        }
    }
}
