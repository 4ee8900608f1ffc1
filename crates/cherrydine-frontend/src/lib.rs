//! Frontend of the ordering client.
//!
//! Everything here runs on a single task: [`run`] multiplexes replies from
//! the backend, commands typed by the user and the notification timers, and
//! applies each to the controllers one at a time. Nothing is shared across
//! threads; the backend is only reachable through [`BackendBridge`].

use cherrydine_bridge::{
    MessageFromBackend, MessageToBackend,
    cart::{DishId, ItemId},
};
use tokio::sync::mpsc;

use crate::{
    controllers::{CartError, add_to_cart::AddToCartController, cart_sync::CartSyncController},
    entities::add_to_cart_entity::CartCounter,
    input::UserIntent,
    notifications::{NotificationCenter, TimerEvent},
    surface::CartSurface,
};

pub mod controllers;
pub mod entities;
pub mod formatting;
pub mod input;
pub mod notifications;
pub mod storage;
pub mod surface;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    async fn send(&self, message: MessageToBackend) -> Result<(), CartError> {
        self.to_backend.send(message).await.map_err(|e| {
            log::error!("Backend is gone, dropping {:?}", e.0);
            CartError::BackendClosed
        })
    }

    pub async fn add_to_cart(&self, dish_id: DishId, quantity: u8) -> Result<(), CartError> {
        self.send(MessageToBackend::AddToCartRequest { dish_id, quantity }).await
    }

    pub async fn update_quantity(
        &self,
        request_id: u64,
        item_id: ItemId,
        quantity: u8,
    ) -> Result<(), CartError> {
        self.send(MessageToBackend::UpdateQuantityRequest {
            request_id,
            item_id,
            quantity,
        })
        .await
    }

    pub async fn remove_line(&self, item_id: ItemId) -> Result<(), CartError> {
        self.send(MessageToBackend::RemoveLineRequest { item_id }).await
    }
}

/// State of the client: the notification stack, the cart table and the add
/// to cart controls, plus the surface they are drawn on.
pub struct App {
    pub notifications: NotificationCenter,
    pub cart: CartSyncController,
    pub add_to_cart: AddToCartController,
    surface: Box<dyn CartSurface>,
}

impl App {
    pub fn new(
        notifications: NotificationCenter,
        bridge: BackendBridge,
        counter: CartCounter,
        surface: Box<dyn CartSurface>,
    ) -> Self {
        Self {
            notifications,
            cart: CartSyncController::new(bridge.clone()),
            add_to_cart: AddToCartController::new(bridge, counter),
            surface,
        }
    }

    fn render_control(&mut self, dish_id: DishId) {
        if let Some(control) = self.add_to_cart.control(dish_id) {
            self.surface.render_add_to_cart_control(control);
        }
    }

    fn render_all(&mut self) {
        self.surface.render_cart(self.cart.table());
        self.surface.render_counter(self.add_to_cart.counter());
        for control in self.add_to_cart.controls() {
            self.surface.render_add_to_cart_control(control);
        }
    }

    /// Applies a message pushed by the backend.
    pub fn handle_backend_message(&mut self, message: MessageFromBackend) {
        match message {
            MessageFromBackend::NotificationMessage(notification) => {
                self.notifications.enqueue(notification.message, notification.severity, true);
            }
            MessageFromBackend::AddToCartResponse { dish_id, result } => {
                self.add_to_cart.apply_add_result(dish_id, result, &mut self.notifications);
                self.surface.render_counter(self.add_to_cart.counter());
                self.render_control(dish_id);
            }
            MessageFromBackend::UpdateQuantityResponse {
                request_id,
                item_id,
                quantity,
                result,
            } => {
                if self.cart.apply_quantity_update(
                    request_id,
                    item_id,
                    quantity,
                    result,
                    &mut self.notifications,
                ) {
                    self.surface.render_cart(self.cart.table());
                }
            }
            MessageFromBackend::RemoveLineResponse { item_id, result } => {
                if self.cart.apply_removal(item_id, result, &mut self.notifications) {
                    self.surface.render_cart(self.cart.table());
                }
            }
        }
    }

    /// Applies a user action. Local rejections are logged; everything the
    /// user needs to see ends up on the surface.
    pub async fn handle_intent(&mut self, intent: UserIntent) {
        let notifications = &mut self.notifications;
        let result = match intent {
            UserIntent::RenderRow {
                item_id,
                quantity,
                subtotal,
            } => self
                .cart
                .render_row(item_id, quantity, subtotal)
                .map(|_| self.surface.render_cart(self.cart.table())),
            UserIntent::Increase { item_id } => {
                self.cart.increase_quantity(item_id, notifications).await
            }
            UserIntent::Decrease { item_id } => {
                self.cart.decrease_quantity(item_id, notifications).await
            }
            UserIntent::SetQuantity { item_id, quantity } => {
                self.cart.request_quantity_update(item_id, quantity, notifications).await
            }
            UserIntent::Remove { item_id } => self.cart.remove_line(item_id, notifications).await,
            UserIntent::RenderControl { dish_id, variant } => {
                let control = self.add_to_cart.render_control(dish_id, variant);
                self.surface.render_add_to_cart_control(control);
                Ok(())
            }
            UserIntent::Step { dish_id, delta } => self
                .add_to_cart
                .adjust_quantity_locally(dish_id, delta)
                .map(|_| self.render_control(dish_id)),
            UserIntent::AddToCart { dish_id, quantity } => {
                let result = self.add_to_cart.add_to_cart(dish_id, quantity, notifications).await;
                self.render_control(dish_id);
                result
            }
            UserIntent::Notify { severity, words } => {
                notifications.enqueue(words.join(" "), severity, true);
                Ok(())
            }
            UserIntent::Dismiss { id } => {
                notifications.dismiss(id);
                Ok(())
            }
            UserIntent::ToggleSound => {
                notifications.toggle_sound().await;
                Ok(())
            }
            UserIntent::Show => {
                self.render_all();
                Ok(())
            }
            UserIntent::Quit => Ok(()),
        };

        if let Err(e) = result {
            log::warn!("{e}");
        }
    }
}

/// Runs the frontend until the user quits or the backend stops.
pub async fn run(
    mut app: App,
    mut timers: mpsc::UnboundedReceiver<TimerEvent>,
    mut rx: mpsc::Receiver<MessageFromBackend>,
    mut intents: mpsc::UnboundedReceiver<UserIntent>,
) -> anyhow::Result<()> {
    app.render_all();

    let result = loop {
        tokio::select! {
            Some(event) = timers.recv() => app.notifications.handle_timer(event),
            message = rx.recv() => match message {
                Some(message) => {
                    log::debug!("Got a message from backend: {message:?}");
                    app.handle_backend_message(message);
                }
                None => break Err(anyhow::anyhow!("backend stopped")),
            },
            intent = intents.recv() => match intent {
                Some(UserIntent::Quit) | None => break Ok(()),
                Some(intent) => app.handle_intent(intent).await,
            },
        }
    };

    app.notifications.shutdown();
    result
}
