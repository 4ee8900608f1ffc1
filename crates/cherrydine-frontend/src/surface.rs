//! Render targets.
//!
//! The controllers and the notification center never draw anything
//! themselves; they describe changes to a surface. [`TerminalSurface`] draws
//! them as lines of text.

use std::io::Write;

use crate::{
    entities::{
        add_to_cart_entity::{AddToCartControl, CartCounter},
        cart_entity::CartTable,
    },
    formatting::{CURRENCY_SIGN, format_price_with_currency},
    notifications::{DisplayedNotification, NotificationId},
};

/// State of the sound toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundToggle {
    pub enabled: bool,
}

impl SoundToggle {
    pub fn icon(&self) -> &'static str {
        if self.enabled {
            "fas fa-volume-up"
        } else {
            "fas fa-volume-mute"
        }
    }

    /// Tooltip describing what clicking the toggle does.
    pub fn tooltip(&self) -> &'static str {
        if self.enabled {
            "Выключить звук уведомлений"
        } else {
            "Включить звук уведомлений"
        }
    }
}

/// Where notifications and the sound toggle are drawn.
pub trait NotificationSurface {
    fn show_notification(&mut self, notification: &DisplayedNotification);
    /// Starts the fade-out of a dismissed notification.
    fn fade_notification(&mut self, id: NotificationId);
    fn remove_notification(&mut self, id: NotificationId);
    fn update_sound_toggle(&mut self, toggle: SoundToggle);
}

/// Where the cart table, the header counter and the add to cart controls are
/// drawn.
pub trait CartSurface {
    fn render_cart(&mut self, table: &CartTable);
    fn render_counter(&mut self, counter: CartCounter);
    fn render_add_to_cart_control(&mut self, control: &AddToCartControl);
}

/// Surface writing to a terminal or any other [`Write`].
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            log::error!("Failed to draw to terminal: {e}");
        }
    }
}

impl<W: Write> NotificationSurface for TerminalSurface<W> {
    fn show_notification(&mut self, notification: &DisplayedNotification) {
        self.line(format_args!(
            "[{}] #{} {}",
            notification.severity.style(),
            notification.id,
            notification.message
        ));
    }

    fn fade_notification(&mut self, id: NotificationId) {
        log::debug!("Fading out notification #{id}");
    }

    fn remove_notification(&mut self, id: NotificationId) {
        self.line(format_args!("[closed] #{id}"));
    }

    fn update_sound_toggle(&mut self, toggle: SoundToggle) {
        let state = if toggle.enabled { "on" } else { "off" };
        self.line(format_args!("[sound {state}] {}", toggle.tooltip()));
    }
}

impl<W: Write> CartSurface for TerminalSurface<W> {
    fn render_cart(&mut self, table: &CartTable) {
        for row in table.rows() {
            self.line(format_args!(
                "  item {:>4} | x{:>2} | {}",
                row.item_id(),
                row.quantity(),
                format_price_with_currency(row.subtotal())
            ));
        }
        self.line(format_args!("  Итого: {} {CURRENCY_SIGN}", table.total_text()));
    }

    fn render_counter(&mut self, counter: CartCounter) {
        if let Some(count) = counter.count() {
            self.line(format_args!("[cart] {count}"));
        }
    }

    fn render_add_to_cart_control(&mut self, control: &AddToCartControl) {
        let disabled = if control.is_enabled() { "" } else { " (disabled)" };
        self.line(format_args!(
            "  dish {:>4} | x{:>2} | {}{disabled}",
            control.dish_id,
            control.quantity,
            control.label()
        ));
    }
}
