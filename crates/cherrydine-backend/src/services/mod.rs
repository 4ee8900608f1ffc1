//! Backend service handlers for frontend-driven requests.
//!
//! This module groups async request handlers that operate on the shared
//! `AppContext`, perform network side effects and report the outcome back to
//! the frontend.

pub mod cart_service;
pub mod session_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;

#[cfg(test)]
pub(crate) mod testing {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use cherrydine_bridge::{
        MessageFromBackend,
        cart::{AddToCartReply, DishId, ItemId, RemoveLineReply, UpdateQuantityReply},
    };
    use reqwest::StatusCode;
    use tokio::sync::mpsc::{self, Receiver};

    use crate::{
        api::{ApiError, CartApi},
        app::AppContext,
    };

    /// Canned outcome of a fake request. `reqwest::Error` cannot be built by
    /// hand, so transport failures are represented by a status-less variant.
    pub enum Canned {
        Ok(&'static str),
        Status(StatusCode),
        InvalidUrl,
    }

    /// [`CartApi`] answering from a script of canned JSON bodies.
    #[derive(Default)]
    pub struct ScriptedApi {
        pub replies: Mutex<VecDeque<Canned>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        pub fn new(replies: Vec<Canned>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn next<T: serde::de::DeserializeOwned>(&self, call: String) -> Result<T, ApiError> {
            self.calls.lock().unwrap().push(call);
            match self.replies.lock().unwrap().pop_front() {
                Some(Canned::Ok(body)) => Ok(serde_json::from_str(body).unwrap()),
                Some(Canned::Status(status)) => Err(ApiError::Status(status)),
                Some(Canned::InvalidUrl) | None => {
                    Err(ApiError::InvalidUrl("no reply scripted".to_string()))
                }
            }
        }
    }

    #[async_trait::async_trait]
    impl CartApi for ScriptedApi {
        async fn prime_session(&self) -> Result<(), ApiError> {
            self.next::<serde_json::Value>("prime".to_string()).map(|_| ())
        }

        async fn add_to_cart(
            &self,
            dish_id: DishId,
            quantity: u8,
        ) -> Result<AddToCartReply, ApiError> {
            self.next(format!("add {dish_id} x{quantity}"))
        }

        async fn update_quantity(
            &self,
            item_id: ItemId,
            quantity: u8,
        ) -> Result<UpdateQuantityReply, ApiError> {
            self.next(format!("update {item_id} x{quantity}"))
        }

        async fn remove_line(&self, item_id: ItemId) -> Result<RemoveLineReply, ApiError> {
            self.next(format!("remove {item_id}"))
        }
    }

    pub fn context(
        api: Arc<ScriptedApi>,
    ) -> (super::AppContextHandle, Receiver<MessageFromBackend>) {
        let (tx, rx) = mpsc::channel(8);
        (Arc::new(AppContext { api, tx }), rx)
    }
}
