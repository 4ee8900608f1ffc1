//! Commands typed into the terminal client.
//!
//! Every stdin line is one command, parsed with `clap` as if it were a
//! command line of its own.

use std::str::FromStr;

use cherrydine_bridge::{
    cart::{DishId, ItemId},
    notification::Severity,
};
use clap::{Parser, Subcommand};

use crate::{entities::add_to_cart_entity::ControlVariant, notifications::NotificationId};

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum UserIntent {
    /// Render a cart line as delivered with the page
    #[command(name = "row")]
    RenderRow {
        item_id: ItemId,
        quantity: u8,
        #[arg(allow_negative_numbers = true)]
        subtotal: f64,
    },
    /// Add one portion to a cart line
    #[command(name = "inc")]
    Increase { item_id: ItemId },
    /// Take one portion off a cart line
    #[command(name = "dec")]
    Decrease { item_id: ItemId },
    /// Set the quantity of a cart line
    #[command(name = "set")]
    SetQuantity { item_id: ItemId, quantity: u8 },
    /// Remove a cart line
    #[command(name = "rm")]
    Remove { item_id: ItemId },
    /// Render an add to cart control for a dish
    #[command(name = "control")]
    RenderControl {
        dish_id: DishId,
        #[arg(value_enum)]
        variant: ControlVariant,
    },
    /// Step the quantity selector of a dish
    #[command(name = "step")]
    Step {
        dish_id: DishId,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Add a dish to the cart, by default as many portions as its selector shows
    #[command(name = "add")]
    AddToCart {
        dish_id: DishId,
        quantity: Option<u8>,
    },
    /// Show a message the way the site's flash messages are shown
    #[command(name = "notify")]
    Notify {
        #[arg(value_parser = severity)]
        severity: Severity,
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
    /// Close a notification
    #[command(name = "dismiss")]
    Dismiss { id: NotificationId },
    /// Turn notification sounds on or off
    #[command(name = "sound")]
    ToggleSound,
    /// Redraw the cart and the controls
    #[command(name = "show")]
    Show,
    /// Leave the client
    #[command(name = "quit")]
    Quit,
}

fn severity(value: &str) -> Result<Severity, String> {
    match value {
        "success" => Ok(Severity::Success),
        "danger" => Ok(Severity::Danger),
        other => Err(format!("expected `success` or `danger`, got `{other}`")),
    }
}

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct CommandLine {
    #[command(subcommand)]
    intent: UserIntent,
}

impl FromStr for UserIntent {
    type Err = clap::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        CommandLine::try_parse_from(line.split_whitespace()).map(|command| command.intent)
    }
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(line: &str) -> Result<UserIntent, clap::Error> {
        line.parse()
    }

    fn error_kind(line: &str) -> ErrorKind {
        parse(line).unwrap_err().kind()
    }

    #[test]
    fn cart_commands() {
        assert_eq!(
            parse("row 7 2 20").unwrap(),
            UserIntent::RenderRow {
                item_id: 7,
                quantity: 2,
                subtotal: 20.0
            }
        );
        assert_eq!(parse("  inc 7 ").unwrap(), UserIntent::Increase { item_id: 7 });
        assert_eq!(parse("dec 7").unwrap(), UserIntent::Decrease { item_id: 7 });
        assert_eq!(
            parse("set 7 3").unwrap(),
            UserIntent::SetQuantity {
                item_id: 7,
                quantity: 3
            }
        );
        assert_eq!(parse("rm 9").unwrap(), UserIntent::Remove { item_id: 9 });
    }

    #[test]
    fn control_commands() {
        assert_eq!(
            parse("control 5 selector").unwrap(),
            UserIntent::RenderControl {
                dish_id: 5,
                variant: ControlVariant::QuantitySelector
            }
        );
        assert_eq!(
            parse("step 5 -2").unwrap(),
            UserIntent::Step {
                dish_id: 5,
                delta: -2
            }
        );
        assert_eq!(
            parse("add 5").unwrap(),
            UserIntent::AddToCart {
                dish_id: 5,
                quantity: None
            }
        );
        assert_eq!(
            parse("add 5 3").unwrap(),
            UserIntent::AddToCart {
                dish_id: 5,
                quantity: Some(3)
            }
        );
    }

    #[test]
    fn notify_keeps_every_word() {
        assert_eq!(
            parse("notify danger Сервер   недоступен").unwrap(),
            UserIntent::Notify {
                severity: Severity::Danger,
                words: vec!["Сервер".to_string(), "недоступен".to_string()]
            }
        );
        assert_eq!(parse("sound").unwrap(), UserIntent::ToggleSound);
        assert_eq!(parse("dismiss 4").unwrap(), UserIntent::Dismiss { id: 4 });
        assert_eq!(parse("quit").unwrap(), UserIntent::Quit);
    }

    #[test]
    fn malformed_commands_are_rejected() {
        assert!(parse("   ").is_err());
        assert_eq!(error_kind("order 5"), ErrorKind::InvalidSubcommand);
        assert_eq!(error_kind("set 7"), ErrorKind::MissingRequiredArgument);
        assert_eq!(error_kind("set 7 300"), ErrorKind::ValueValidation);
        assert_eq!(error_kind("control 5 button"), ErrorKind::InvalidValue);
        assert_eq!(error_kind("notify warning Внимание"), ErrorKind::ValueValidation);
        assert_eq!(error_kind("notify success"), ErrorKind::MissingRequiredArgument);
        assert!(parse("show now").is_err());
    }
}
