/// Auth client: the single point of entry for all calls to the auth backend.
///
/// The session store only talks to the backend through the `AuthApi` trait;
/// `HttpAuthApi` is the production implementation over `reqwest`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{ApiError, GENERIC_FAILURE};
use crate::models::{LoginCredentials, Principal, ProfileCompletionData, RegisterCredentials, Role};

pub mod endpoints;

/// Remote auth operations consumed by the session store.
///
/// Sign-in, sign-up, sign-out and profile completion only report success;
/// the canonical principal always comes from `who_am_i` or `refresh`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn who_am_i(&self) -> Result<Principal, ApiError>;

    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<(), ApiError>;

    async fn sign_up(&self, credentials: &RegisterCredentials) -> Result<(), ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    async fn refresh(&self) -> Result<Principal, ApiError>;

    async fn complete_profile(
        &self,
        role: Role,
        data: &ProfileCompletionData,
    ) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `AuthApi` over HTTP. Credentials travel as cookies kept in the client's
/// cookie store; a bearer token is attached as well when configured.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpAuthApi {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        bearer_token: Option<String>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.api_url.clone(),
            config.request_timeout,
            config.bearer_token.clone(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("content-type", "application/json");
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and returns the raw body of a 2xx response.
    /// Non-2xx responses become `ApiError::Status` carrying the backend's message.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout
            } else {
                ApiError::Http(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!("Auth API {} returned {}: {}", path, status, message);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Auth API {} returned {}", path, status);
        Ok(body)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let builder = self.request(Method::POST, path);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };
        self.send(builder, path).await
    }

    async fn fetch_principal(&self, method: Method, path: &str) -> Result<Principal, ApiError> {
        let body = self.send(self.request(method, path), path).await?;
        decode_envelope(&body)
    }
}

/// Principal payloads arrive either wrapped in `{"data": ...}` or bare,
/// depending on the endpoint. The branch is picked before decoding so the
/// payload's own error (an unknown role, say) is what gets reported.
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let mut value: Value = serde_json::from_str(body)?;
    let payload = match value.as_object_mut().and_then(|map| map.remove("data")) {
        Some(data) => data,
        None => value,
    };
    Ok(serde_json::from_value(payload)?)
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn who_am_i(&self) -> Result<Principal, ApiError> {
        self.fetch_principal(Method::GET, endpoints::ME).await
    }

    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        self.post(endpoints::SIGN_IN, Some(credentials)).await?;
        Ok(())
    }

    async fn sign_up(&self, credentials: &RegisterCredentials) -> Result<(), ApiError> {
        self.post(endpoints::SIGN_UP, Some(credentials)).await?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.post::<()>(endpoints::SIGN_OUT, None).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<Principal, ApiError> {
        self.fetch_principal(Method::POST, endpoints::REFRESH).await
    }

    async fn complete_profile(
        &self,
        role: Role,
        data: &ProfileCompletionData,
    ) -> Result<(), ApiError> {
        self.post(endpoints::profile_endpoint(role), Some(data)).await?;
        Ok(())
    }
}
