//! HTTP access to the restaurant's cart endpoints.
//!
//! All mutating requests are `POST`s that must carry the site's CSRF token in
//! the `X-CSRFToken` header. The token is read from the `csrftoken` cookie,
//! which the site hands out on any page load; [`CartApi::prime_session`] makes
//! such a page load once at startup.

use std::sync::Arc;

use cherrydine_bridge::cart::{
    AddToCartReply, DishId, ItemId, QuantityBody, RemoveLineReply, UpdateQuantityReply,
};
use reqwest::{
    StatusCode, Url,
    cookie::{CookieStore, Jar},
};
use serde::de::DeserializeOwned;

/// Name of the cookie holding the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Name of the header the CSRF token is echoed in.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Name of the cookie holding the user's session.
pub const SESSION_COOKIE: &str = "sessionid";

/// Errors that can occur while talking to the cart endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL or a derived endpoint is not a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The request could not be sent or the response could not be received.
    #[error("failed to reach the server: {0}")]
    Transport(#[source] reqwest::Error),
    /// The server answered with a non-2xx status. The body is not trusted.
    #[error("server responded with {0}")]
    Status(StatusCode),
    /// The server answered 2xx, but the body is not the expected JSON.
    #[error("failed to decode server response: {0}")]
    Decode(#[source] reqwest::Error),
    /// The HTTP client itself could not be built.
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Operations the backend performs against the site's cart.
#[async_trait::async_trait]
pub trait CartApi: Send + Sync {
    /// Loads the cart page once so the site sets the CSRF cookie.
    async fn prime_session(&self) -> Result<(), ApiError>;

    /// `POST /cart/add/{dish_id}/`.
    async fn add_to_cart(&self, dish_id: DishId, quantity: u8)
    -> Result<AddToCartReply, ApiError>;

    /// `POST /cart/update/{item_id}/`.
    async fn update_quantity(
        &self,
        item_id: ItemId,
        quantity: u8,
    ) -> Result<UpdateQuantityReply, ApiError>;

    /// `POST /cart/remove/{item_id}/`.
    async fn remove_line(&self, item_id: ItemId) -> Result<RemoveLineReply, ApiError>;
}

/// [`CartApi`] backed by a pooled `reqwest` client with a cookie jar.
pub struct HttpCartApi {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl HttpCartApi {
    /// Creates a client for the site at `base_url`. When `session_id` is
    /// given, it is stored as the session cookie so requests run on behalf of
    /// an already logged in user.
    pub fn new(base_url: &str, session_id: Option<&str>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        let jar = Arc::new(Jar::default());
        if let Some(session_id) = session_id {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={session_id}; Path=/"), &base_url);
        }

        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            jar,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    /// Current CSRF token, if the site has set one.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        cookie_value(header.to_str().ok()?, CSRF_COOKIE)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<QuantityBody>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.post(self.endpoint(path)?);
        match self.csrf_token() {
            Some(token) => request = request.header(CSRF_HEADER, token),
            None => log::warn!("No {CSRF_COOKIE} cookie yet, posting to {path} without a token"),
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

#[async_trait::async_trait]
impl CartApi for HttpCartApi {
    async fn prime_session(&self) -> Result<(), ApiError> {
        let url = self.endpoint("cart/")?;
        log::info!("Priming session from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        if self.csrf_token().is_none() {
            log::warn!("The site did not set a {CSRF_COOKIE} cookie");
        }
        Ok(())
    }

    async fn add_to_cart(
        &self,
        dish_id: DishId,
        quantity: u8,
    ) -> Result<AddToCartReply, ApiError> {
        self.post(
            &format!("cart/add/{dish_id}/"),
            Some(QuantityBody { quantity }),
        )
        .await
    }

    async fn update_quantity(
        &self,
        item_id: ItemId,
        quantity: u8,
    ) -> Result<UpdateQuantityReply, ApiError> {
        self.post(
            &format!("cart/update/{item_id}/"),
            Some(QuantityBody { quantity }),
        )
        .await
    }

    async fn remove_line(&self, item_id: ItemId) -> Result<RemoveLineReply, ApiError> {
        self.post(&format!("cart/remove/{item_id}/"), None).await
    }
}

/// Extracts the value of cookie `name` from a `Cookie` header value such as
/// `"a=1; csrftoken=abc"`.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|cookie| cookie.strip_prefix(name)?.strip_prefix('='))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    #[test]
    fn cookie_value_picks_named_cookie() {
        let header = "sessionid=s3cr3t; csrftoken=abc123; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken"), Some("abc123".to_string()));
        assert_eq!(cookie_value(header, "sessionid"), Some("s3cr3t".to_string()));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn cookie_value_does_not_match_prefixes() {
        assert_eq!(cookie_value("csrftoken_old=1", "csrftoken"), None);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            HttpCartApi::new("not a url", None),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    /// A canned response of the fake site.
    struct Reply {
        status: &'static str,
        headers: &'static str,
        body: &'static str,
    }

    /// Serves canned responses, one connection per request, and records the
    /// raw requests it receives.
    async fn spawn_site(routes: Vec<(&'static str, Reply)>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let recorded = seen.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buffer = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    let read = socket.read(&mut chunk).await.unwrap();
                    if read == 0 {
                        break;
                    }
                    buffer.extend_from_slice(&chunk[..read]);
                    let text = String::from_utf8_lossy(&buffer).to_lowercase();
                    if let Some(head_end) = text.find("\r\n\r\n") {
                        let content_length = text[..head_end]
                            .lines()
                            .find_map(|line| line.strip_prefix("content-length:"))
                            .map(|value| value.trim().parse::<usize>().unwrap())
                            .unwrap_or(0);
                        if buffer.len() >= head_end + 4 + content_length {
                            break;
                        }
                    }
                }

                let request = String::from_utf8_lossy(&buffer).to_string();
                let request_line = request.lines().next().unwrap_or_default().to_string();
                recorded.lock().unwrap().push(request);

                let response = match routes
                    .iter()
                    .find(|(route, _)| request_line.starts_with(route))
                {
                    Some((_, reply)) => format!(
                        "HTTP/1.1 {}\r\n{}content-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        reply.status,
                        reply.headers,
                        reply.body.len(),
                        reply.body,
                    ),
                    None => "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                        .to_string(),
                };
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{address}/"), seen)
    }

    fn cart_page() -> (&'static str, Reply) {
        (
            "GET /cart/ ",
            Reply {
                status: "200 OK",
                headers: "set-cookie: csrftoken=abc123; Path=/\r\n",
                body: "{}",
            },
        )
    }

    #[tokio::test]
    async fn update_sends_csrf_token_from_primed_cookie() {
        let (base_url, seen) = spawn_site(vec![
            cart_page(),
            (
                "POST /cart/update/7/ ",
                Reply {
                    status: "200 OK",
                    headers: "",
                    body: r#"{"success": true, "subtotal": 30}"#,
                },
            ),
        ])
        .await;

        let api = HttpCartApi::new(&base_url, Some("s3cr3t")).unwrap();
        api.prime_session().await.unwrap();
        assert_eq!(api.csrf_token(), Some("abc123".to_string()));

        let reply = api.update_quantity(7, 3).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.subtotal, Some(30.0));

        let requests = seen.lock().unwrap();
        let update = requests[1].to_lowercase();
        assert!(update.starts_with("post /cart/update/7/ "));
        assert!(update.contains("x-csrftoken: abc123"));
        assert!(update.contains("sessionid=s3cr3t"));
        assert!(update.ends_with(r#"{"quantity":3}"#));
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure_even_with_json_body() {
        let (base_url, _) = spawn_site(vec![(
            "POST /cart/add/5/ ",
            Reply {
                status: "404 Not Found",
                headers: "",
                body: r#"{"success": false, "message": "Товар не найден"}"#,
            },
        )])
        .await;

        let api = HttpCartApi::new(&base_url, None).unwrap();
        match api.add_to_cart(5, 1).await {
            Err(ApiError::Status(status)) => assert_eq!(status, StatusCode::NOT_FOUND),
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn remove_posts_without_body() {
        let (base_url, seen) = spawn_site(vec![(
            "POST /cart/remove/9/ ",
            Reply {
                status: "200 OK",
                headers: "",
                body: r#"{"success": true, "message": "Удалено"}"#,
            },
        )])
        .await;

        let api = HttpCartApi::new(&base_url, None).unwrap();
        let reply = api.remove_line(9).await.unwrap();
        assert_eq!(reply.message.as_deref(), Some("Удалено"));

        let requests = seen.lock().unwrap();
        assert!(!requests[0].to_lowercase().contains("x-csrftoken"));
        assert!(requests[0].ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let (base_url, _) = spawn_site(vec![(
            "POST /cart/update/1/ ",
            Reply {
                status: "200 OK",
                headers: "",
                body: "<html>login</html>",
            },
        )])
        .await;

        let api = HttpCartApi::new(&base_url, None).unwrap();
        assert!(matches!(
            api.update_quantity(1, 2).await,
            Err(ApiError::Decode(_))
        ));
    }
}
