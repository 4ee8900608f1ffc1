use cherrydine_bridge::cart::DishId;

/// Label of a control ready to add a dish.
pub const READY_LABEL: &str = "В корзину";
/// Label of a control waiting for the site.
pub const PENDING_LABEL: &str = "Добавление...";
/// Label of the link that replaces a quantity selector once the dish is in
/// the cart.
pub const GO_TO_CART_LABEL: &str = "Перейти в корзину";

/// Where the add to cart control is rendered, which decides what it turns
/// into after a successful addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ControlVariant {
    /// Plain button on the menu; stays a button and can be clicked again.
    Counter,
    /// Button with a quantity selector on the dish page; becomes a link to
    /// the cart.
    #[value(name = "selector")]
    QuantitySelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Ready,
    /// Disabled until the site answers.
    Pending,
    /// Replaced by a link to the cart.
    GoToCart,
}

/// An add to cart control for a single dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddToCartControl {
    pub dish_id: DishId,
    pub variant: ControlVariant,
    pub state: ControlState,
    /// Value of the quantity selector; always 1 for the counter variant.
    pub quantity: u8,
}

impl AddToCartControl {
    pub fn new(dish_id: DishId, variant: ControlVariant) -> Self {
        Self {
            dish_id,
            variant,
            state: ControlState::Ready,
            quantity: 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.state {
            ControlState::Ready => READY_LABEL,
            ControlState::Pending => PENDING_LABEL,
            ControlState::GoToCart => GO_TO_CART_LABEL,
        }
    }

    /// Whether a click starts a new addition.
    pub fn is_enabled(&self) -> bool {
        self.state == ControlState::Ready
    }
}

/// The cart item counter in the page header. Pages without a header render
/// no counter and updates to it are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartCounter(Option<u32>);

impl CartCounter {
    pub fn rendered(count: u32) -> Self {
        Self(Some(count))
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn count(&self) -> Option<u32> {
        self.0
    }

    /// Shows the server-reported count. Returns whether anything changed.
    pub fn set(&mut self, count: u32) -> bool {
        match self.0 {
            Some(ref mut current) => {
                let changed = *current != count;
                *current = count;
                changed
            }
            None => {
                log::debug!("No cart counter rendered, dropping count {count}");
                false
            }
        }
    }
}
