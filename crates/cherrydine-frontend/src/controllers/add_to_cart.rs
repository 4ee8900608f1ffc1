//! Add to cart controls on the menu and dish pages.

use std::collections::BTreeMap;

use cherrydine_bridge::cart::{AddedToCart, DishId, RequestFailure};

use super::{ADD_FAILED_MESSAGE, CartError, cart_sync, check_quantity};
use crate::{
    BackendBridge,
    entities::add_to_cart_entity::{AddToCartControl, CartCounter, ControlState, ControlVariant},
    notifications::NotificationCenter,
};

/// Owns the rendered add to cart controls and the header counter.
pub struct AddToCartController {
    controls: BTreeMap<DishId, AddToCartControl>,
    counter: CartCounter,
    bridge: BackendBridge,
}

impl AddToCartController {
    pub fn new(bridge: BackendBridge, counter: CartCounter) -> Self {
        Self {
            controls: BTreeMap::new(),
            counter,
            bridge,
        }
    }

    pub fn counter(&self) -> CartCounter {
        self.counter
    }

    pub fn control(&self, dish_id: DishId) -> Option<&AddToCartControl> {
        self.controls.get(&dish_id)
    }

    pub fn controls(&self) -> impl Iterator<Item = &AddToCartControl> {
        self.controls.values()
    }

    /// Renders a control for a dish, replacing whatever was there.
    pub fn render_control(
        &mut self,
        dish_id: DishId,
        variant: ControlVariant,
    ) -> &AddToCartControl {
        self.controls.insert(dish_id, AddToCartControl::new(dish_id, variant));
        &self.controls[&dish_id]
    }

    /// Steps the quantity selector of a dish page. Counter controls have no
    /// selector and keep adding one portion.
    pub fn adjust_quantity_locally(
        &mut self,
        dish_id: DishId,
        delta: i32,
    ) -> Result<u8, CartError> {
        let control = self
            .controls
            .get_mut(&dish_id)
            .ok_or(CartError::UnknownControl(dish_id))?;
        if control.variant == ControlVariant::Counter {
            log::debug!("Dish {dish_id} has no quantity selector");
            return Ok(control.quantity);
        }
        control.quantity = cart_sync::adjust_quantity_locally(control.quantity, delta);
        Ok(control.quantity)
    }

    /// Handles a click on the control of a dish. `quantity` overrides the
    /// selector value. Clicks on a control that is not ready are ignored, so
    /// a dish is never added twice by one impatient user.
    pub async fn add_to_cart(
        &mut self,
        dish_id: DishId,
        quantity: Option<u8>,
        notifications: &mut NotificationCenter,
    ) -> Result<(), CartError> {
        let control = self
            .controls
            .get_mut(&dish_id)
            .ok_or(CartError::UnknownControl(dish_id))?;
        if !control.is_enabled() {
            log::debug!("Ignoring click on dish {dish_id}, its control is {:?}", control.state);
            return Ok(());
        }
        let quantity = check_quantity(quantity.unwrap_or(control.quantity))?;
        control.state = ControlState::Pending;

        if let Err(e) = self.bridge.add_to_cart(dish_id, quantity).await {
            if let Some(control) = self.controls.get_mut(&dish_id) {
                control.state = ControlState::Ready;
            }
            notifications.danger(ADD_FAILED_MESSAGE);
            return Err(e);
        }
        Ok(())
    }

    /// Applies the site's reply to an addition.
    pub fn apply_add_result(
        &mut self,
        dish_id: DishId,
        result: Result<AddedToCart, RequestFailure>,
        notifications: &mut NotificationCenter,
    ) {
        let control = self.controls.get_mut(&dish_id);
        if control.is_none() {
            log::warn!("Reply for dish {dish_id} has no rendered control");
        }

        match result {
            Ok(added) => {
                notifications.success(added.message);
                self.counter.set(added.cart_total);
                if let Some(control) = control {
                    control.state = match control.variant {
                        ControlVariant::Counter => ControlState::Ready,
                        ControlVariant::QuantitySelector => ControlState::GoToCart,
                    };
                }
            }
            Err(failure) => {
                log::warn!("Adding dish {dish_id} failed: {failure}");
                notifications.danger(failure.server_message().unwrap_or(ADD_FAILED_MESSAGE));
                if let Some(control) = control {
                    control.state = ControlState::Ready;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cherrydine_bridge::{MessageToBackend, notification::Severity};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        entities::add_to_cart_entity::{PENDING_LABEL, READY_LABEL},
        notifications::testing::harness,
    };

    fn sent_add(message: MessageToBackend) -> (DishId, u8) {
        match message {
            MessageToBackend::AddToCartRequest { dish_id, quantity } => (dish_id, quantity),
            other => panic!("unexpected request {other:?}"),
        }
    }

    fn added(total: u32) -> Result<AddedToCart, RequestFailure> {
        Ok(AddedToCart {
            message: "Блюдо добавлено в корзину".to_string(),
            cart_total: total,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn click_disables_control_until_reply() {
        let (bridge, mut rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::rendered(0));
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::Counter);

        controller.add_to_cart(5, None, &mut h.center).await.unwrap();
        let control = controller.control(5).unwrap();
        assert_eq!(control.label(), PENDING_LABEL);
        assert!(!control.is_enabled());

        // a second click while waiting sends nothing
        controller.add_to_cart(5, None, &mut h.center).await.unwrap();
        assert_eq!(sent_add(rx.try_recv().unwrap()), (5, 1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn counter_control_is_reusable_after_success() {
        let (bridge, _rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::rendered(2));
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::Counter);
        controller.add_to_cart(5, None, &mut h.center).await.unwrap();

        controller.apply_add_result(5, added(3), &mut h.center);

        assert_eq!(controller.control(5).unwrap().label(), READY_LABEL);
        assert_eq!(controller.counter().count(), Some(3));
        assert_eq!(h.surface.shown(), vec!["Блюдо добавлено в корзину"]);
        assert_eq!(h.center.visible()[0].severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn selector_becomes_link_to_cart() {
        let (bridge, mut rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::absent());
        let mut h = harness().await;
        controller.render_control(8, ControlVariant::QuantitySelector);
        assert_eq!(controller.adjust_quantity_locally(8, 3).unwrap(), 4);

        controller.add_to_cart(8, None, &mut h.center).await.unwrap();
        assert_eq!(sent_add(rx.try_recv().unwrap()), (8, 4));
        controller.apply_add_result(8, added(4), &mut h.center);

        let control = controller.control(8).unwrap();
        assert_eq!(control.state, ControlState::GoToCart);
        assert!(!control.is_enabled());
        // no header on this page
        assert_eq!(controller.counter().count(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_addition_restores_control() {
        let (bridge, _rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::rendered(2));
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::Counter);
        controller.add_to_cart(5, Some(1), &mut h.center).await.unwrap();

        controller.apply_add_result(5, Err(RequestFailure::Status(500)), &mut h.center);

        let control = controller.control(5).unwrap();
        assert!(control.is_enabled());
        assert_eq!(control.label(), READY_LABEL);
        assert_eq!(controller.counter().count(), Some(2));
        assert_eq!(h.center.visible().len(), 1);
        assert_eq!(h.center.visible()[0].severity, Severity::Danger);
        assert_eq!(h.center.visible()[0].message, ADD_FAILED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn rejection_shows_site_message() {
        let (bridge, _rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::rendered(0));
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::QuantitySelector);
        controller.add_to_cart(5, None, &mut h.center).await.unwrap();

        controller.apply_add_result(
            5,
            Err(RequestFailure::Rejected(Some("Блюдо недоступно".to_string()))),
            &mut h.center,
        );

        assert_eq!(h.surface.shown(), vec!["Блюдо недоступно"]);
        assert_eq!(controller.control(5).unwrap().state, ControlState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_requests_send_nothing() {
        let (bridge, mut rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::absent());
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::QuantitySelector);

        assert_eq!(
            controller.add_to_cart(6, None, &mut h.center).await,
            Err(CartError::UnknownControl(6))
        );
        assert_eq!(
            controller.add_to_cart(5, Some(0), &mut h.center).await,
            Err(CartError::QuantityOutOfRange(0))
        );
        assert!(rx.try_recv().is_err());
        assert!(controller.control(5).unwrap().is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn closed_backend_restores_control() {
        let (bridge, rx) = crate::testing::bridge();
        drop(rx);
        let mut controller = AddToCartController::new(bridge, CartCounter::absent());
        let mut h = harness().await;
        controller.render_control(5, ControlVariant::Counter);

        assert_eq!(
            controller.add_to_cart(5, None, &mut h.center).await,
            Err(CartError::BackendClosed)
        );
        assert!(controller.control(5).unwrap().is_enabled());
        assert_eq!(h.surface.shown(), vec![ADD_FAILED_MESSAGE]);
    }

    #[test]
    fn selector_steps_are_clamped() {
        let (bridge, _rx) = crate::testing::bridge();
        let mut controller = AddToCartController::new(bridge, CartCounter::absent());
        controller.render_control(1, ControlVariant::QuantitySelector);
        controller.render_control(2, ControlVariant::Counter);

        assert_eq!(controller.adjust_quantity_locally(1, -5).unwrap(), 1);
        assert_eq!(controller.adjust_quantity_locally(1, 200).unwrap(), 99);
        assert_eq!(controller.adjust_quantity_locally(2, 4).unwrap(), 1);
        assert_eq!(
            controller.adjust_quantity_locally(3, 1),
            Err(CartError::UnknownControl(3))
        );
    }
}
