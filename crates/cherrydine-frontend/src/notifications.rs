//! The notification stack.
//!
//! Notifications are admitted to the screen in the order they were enqueued,
//! at most [`NotificationConfig::max_visible`] at a time; the rest wait in an
//! unbounded queue. A displayed notification dismisses itself after
//! [`NotificationConfig::auto_dismiss_ms`] or when the user closes it, fades
//! out for [`NotificationConfig::fade_out_ms`] and is then removed, which
//! frees its slot for the next queued one.
//!
//! The sound cue is independent of admission: it plays when a notification
//! is enqueued, even if the notification itself has to wait for a slot.
//!
//! Timers are plain `tokio` sleeps that post a [`TimerEvent`] back to the
//! event loop owning the center. They are never cancelled; a timer that fires
//! for a notification that is already gone does nothing.

use std::{collections::VecDeque, time::Duration};

use cherrydine_audio::CuePlayer;
use cherrydine_bridge::{config::NotificationConfig, notification::Severity};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    time::Instant,
};

use crate::{
    storage::PreferenceStore,
    surface::{NotificationSurface, SoundToggle},
};

/// Identifier of a displayed notification, unique for the lifetime of the
/// center.
pub type NotificationId = u64;

/// A notification waiting for a free slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub message: String,
    pub severity: Severity,
    pub play_sound: bool,
}

/// A notification currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNotification {
    pub id: NotificationId,
    pub severity: Severity,
    pub message: String,
    pub created_at: Instant,
    fading: bool,
}

impl DisplayedNotification {
    /// Whether the notification was dismissed and is fading out.
    pub fn is_fading(&self) -> bool {
        self.fading
    }
}

/// Deadlines posted back to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The notification has been on screen long enough.
    AutoDismiss(NotificationId),
    /// The fade-out of a dismissed notification is over.
    FadeElapsed(NotificationId),
}

/// Owns the notification queue, the displayed notifications and the sound
/// preference.
pub struct NotificationCenter {
    config: NotificationConfig,
    queue: VecDeque<NotificationRequest>,
    visible: Vec<DisplayedNotification>,
    next_id: NotificationId,
    sound_enabled: bool,
    store: PreferenceStore,
    player: Box<dyn CuePlayer>,
    surface: Box<dyn NotificationSurface>,
    timers: UnboundedSender<TimerEvent>,
    shut_down: bool,
}

impl NotificationCenter {
    /// Creates a center with an empty stack and the sound preference read
    /// from `store`. The returned receiver yields the center's timer events,
    /// which must be fed back through [`NotificationCenter::handle_timer`].
    pub async fn initialize(
        mut config: NotificationConfig,
        store: PreferenceStore,
        player: Box<dyn CuePlayer>,
        mut surface: Box<dyn NotificationSurface>,
    ) -> (Self, UnboundedReceiver<TimerEvent>) {
        if config.max_visible == 0 {
            log::warn!("max_visible is 0, showing one notification at a time instead");
            config.max_visible = 1;
        }

        let sound_enabled = store.load_sound_enabled().await;
        log::info!("Notification sounds are {}", if sound_enabled { "on" } else { "off" });
        surface.update_sound_toggle(SoundToggle {
            enabled: sound_enabled,
        });

        let (timers, timer_rx) = mpsc::unbounded_channel();
        let center = Self {
            config,
            queue: VecDeque::new(),
            visible: Vec::new(),
            next_id: 0,
            sound_enabled,
            store,
            player,
            surface,
            timers,
            shut_down: false,
        };
        (center, timer_rx)
    }

    /// Queues a notification for display. Empty messages are ignored.
    pub fn enqueue(&mut self, message: impl Into<String>, severity: Severity, play_sound: bool) {
        if self.shut_down {
            return;
        }

        let message = message.into();
        if message.trim().is_empty() {
            log::debug!("Ignoring empty {} notification", severity.style());
            return;
        }

        if play_sound {
            self.play_notification_sound();
        }
        self.queue.push_back(NotificationRequest {
            message,
            severity,
            play_sound,
        });
        self.drain();
    }

    /// Queues a success notification with sound.
    pub fn success(&mut self, message: impl Into<String>) {
        self.enqueue(message, Severity::Success, true);
    }

    /// Queues a danger notification with sound.
    pub fn danger(&mut self, message: impl Into<String>) {
        self.enqueue(message, Severity::Danger, true);
    }

    /// Admits queued notifications while there are free slots.
    fn drain(&mut self) {
        while self.visible.len() < self.config.max_visible {
            let Some(request) = self.queue.pop_front() else {
                break;
            };

            self.next_id += 1;
            let notification = DisplayedNotification {
                id: self.next_id,
                severity: request.severity,
                message: request.message,
                created_at: Instant::now(),
                fading: false,
            };
            self.surface.show_notification(&notification);
            self.schedule(
                Duration::from_millis(self.config.auto_dismiss_ms),
                TimerEvent::AutoDismiss(notification.id),
            );
            self.visible.push(notification);
        }
    }

    /// Starts dismissing a displayed notification. Unknown ids and
    /// notifications already fading out are ignored.
    pub fn dismiss(&mut self, id: NotificationId) {
        let Some(notification) = self.visible.iter_mut().find(|n| n.id == id) else {
            log::debug!("Notification #{id} is not displayed, nothing to dismiss");
            return;
        };
        if notification.fading {
            return;
        }

        notification.fading = true;
        self.surface.fade_notification(id);
        self.schedule(
            Duration::from_millis(self.config.fade_out_ms),
            TimerEvent::FadeElapsed(id),
        );
    }

    /// Applies a timer event produced by this center.
    pub fn handle_timer(&mut self, event: TimerEvent) {
        if self.shut_down {
            return;
        }
        match event {
            TimerEvent::AutoDismiss(id) => self.dismiss(id),
            TimerEvent::FadeElapsed(id) => self.remove(id),
        }
    }

    fn remove(&mut self, id: NotificationId) {
        let Some(position) = self.visible.iter().position(|n| n.id == id) else {
            return;
        };
        self.visible.remove(position);
        self.surface.remove_notification(id);
        self.drain();
    }

    fn schedule(&self, delay: Duration, event: TimerEvent) {
        let timers = self.timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // the center may be gone by now
            let _ = timers.send(event);
        });
    }

    /// Flips the sound preference and persists it. Notifications already
    /// queued or displayed are not affected.
    pub async fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        if let Err(e) = self.store.save_sound_enabled(self.sound_enabled).await {
            log::error!("Failed to persist sound preference: {e}");
        }
        self.surface.update_sound_toggle(SoundToggle {
            enabled: self.sound_enabled,
        });
        self.sound_enabled
    }

    /// Plays the notification cue from its start if sounds are enabled.
    pub fn play_notification_sound(&mut self) {
        if !self.sound_enabled {
            return;
        }
        if let Err(e) = self.player.play() {
            log::error!("Failed to play notification sound: {e}");
        }
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Notifications on screen, oldest first.
    pub fn visible(&self) -> &[DisplayedNotification] {
        &self.visible
    }

    /// Number of notifications waiting for a slot.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drops everything queued, removes displayed notifications from the
    /// surface and ignores any later input.
    pub fn shutdown(&mut self) {
        self.queue.clear();
        for notification in self.visible.drain(..) {
            self.surface.remove_notification(notification.id);
        }
        self.shut_down = true;
    }
}
