//! `reqwest`-backed implementations of the service traits.
//!
//! The bearer token comes from the injected session store on every
//! call, so a token persisted by the login step is picked up without
//! rebuilding the services.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use yagam_core::environment::SessionStore;

use crate::services::{
    CreateOrderPayload, CreateOrderResponse, IdentityService, OTP_CHANNEL, OTP_TEMPLATE_ID,
    OrderService, OtpRequest, RegistrationPayload, RegistrationService, ServiceError,
    ServiceFuture, UserProfile, VerifiedSession, VerifyOtpRequest, VerifyPaymentPayload,
    VerifyPaymentResponse,
};
use crate::session::with_country_code;

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Map a non-success response into the error taxonomy, reading the
/// server message when one is present.
async fn error_for(response: reqwest::Response) -> ServiceError {
    let status = response.status().as_u16();
    let message = response
        .json::<ApiMessage>()
        .await
        .map(|body| body.message)
        .unwrap_or_default();
    if status == 401 {
        ServiceError::Unauthorized { message }
    } else {
        ServiceError::Api { status, message }
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    if !response.status().is_success() {
        return Err(error_for(response).await);
    }
    Ok(response.json::<T>().await?)
}

fn bearer(
    builder: reqwest::RequestBuilder,
    session: &Arc<dyn SessionStore>,
) -> reqwest::RequestBuilder {
    match session.get() {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Identity service over HTTP
#[derive(Clone)]
pub struct HttpIdentityService {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpIdentityService {
    /// Create a service against the given base URL
    #[must_use]
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    data: VerifyData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyData {
    access_token: String,
    user: VerifyUser,
}

#[derive(Debug, Deserialize)]
struct VerifyUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MeEnvelope {
    data: MeData,
}

#[derive(Debug, Deserialize)]
struct MeData {
    user: UserProfile,
}

impl IdentityService for HttpIdentityService {
    fn send_otp(&self, phone_number: &str) -> ServiceFuture<()> {
        let client = self.client.clone();
        let url = format!("{}/auth/whatsapp/otp", self.base_url);
        let body = OtpRequest {
            phone_number: with_country_code(phone_number),
            template_id: OTP_TEMPLATE_ID.to_string(),
            channel: OTP_CHANNEL.to_string(),
        };
        Box::pin(async move {
            tracing::debug!(url = %url, "sending otp");
            let response = client.post(&url).json(&body).send().await?;
            if !response.status().is_success() {
                return Err(error_for(response).await);
            }
            Ok(())
        })
    }

    fn verify_otp(&self, phone_number: &str, otp: &str) -> ServiceFuture<VerifiedSession> {
        let client = self.client.clone();
        let url = format!("{}/auth/whatsapp/verify", self.base_url);
        let body = VerifyOtpRequest {
            phone_number: with_country_code(phone_number),
            otp: otp.to_string(),
            channel: OTP_CHANNEL.to_string(),
        };
        Box::pin(async move {
            tracing::debug!(url = %url, "verifying otp");
            let response = client.post(&url).json(&body).send().await?;
            let envelope: VerifyEnvelope = read_json(response).await?;
            Ok(VerifiedSession {
                access_token: envelope.data.access_token,
                user_id: envelope.data.user.id,
            })
        })
    }

    fn current_user(&self) -> ServiceFuture<UserProfile> {
        let client = self.client.clone();
        let session = Arc::clone(&self.session);
        let url = format!("{}/users/me", self.base_url);
        Box::pin(async move {
            tracing::debug!(url = %url, "resolving current user");
            let response = bearer(client.get(&url), &session).send().await?;
            let envelope: MeEnvelope = read_json(response).await?;
            Ok(envelope.data.user)
        })
    }
}

/// Order and payment service over HTTP
#[derive(Clone)]
pub struct HttpOrderService {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpOrderService {
    /// Create a service against the given base URL
    #[must_use]
    pub fn new(base_url: &str, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }
}

impl OrderService for HttpOrderService {
    fn create_order(&self, payload: CreateOrderPayload) -> ServiceFuture<CreateOrderResponse> {
        let client = self.client.clone();
        let session = Arc::clone(&self.session);
        let url = format!("{}/payments/orders", self.base_url);
        Box::pin(async move {
            tracing::info!(url = %url, receipt = %payload.receipt, "creating payment order");
            let response = bearer(client.post(&url), &session)
                .json(&payload)
                .send()
                .await?;
            read_json(response).await
        })
    }

    fn verify_payment(&self, payload: VerifyPaymentPayload) -> ServiceFuture<VerifyPaymentResponse> {
        let client = self.client.clone();
        let session = Arc::clone(&self.session);
        let url = format!("{}/payments/verify", self.base_url);
        Box::pin(async move {
            tracing::info!(url = %url, order_id = %payload.razorpay_order_id, "verifying payment");
            let response = bearer(client.post(&url), &session)
                .json(&payload)
                .send()
                .await?;
            read_json(response).await
        })
    }
}

/// Free registration service over HTTP
#[derive(Clone)]
pub struct HttpRegistrationService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistrationService {
    /// Create a service against the given base URL
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl RegistrationService for HttpRegistrationService {
    fn register(&self, payload: RegistrationPayload) -> ServiceFuture<()> {
        let client = self.client.clone();
        let url = format!("{}/launch-event/free-registration", self.base_url);
        Box::pin(async move {
            tracing::info!(url = %url, "submitting free registration");
            let response = client.post(&url).json(&payload).send().await?;
            if !response.status().is_success() {
                return Err(error_for(response).await);
            }
            Ok(())
        })
    }
}
