//! Configuration for the booking workflows.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Publishable test key used when neither the backend nor the
/// environment provides one
pub const FALLBACK_RAZORPAY_KEY: &str = "rzp_test_RwZ8BsBI6seUZG";

/// Service endpoints and gateway key
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Identity service base URL (OTP, profile)
    pub identity_base_url: String,
    /// Order and payment service base URL
    pub payment_base_url: String,
    /// App-control service base URL (free registration)
    pub app_base_url: String,
    /// Publishable Razorpay key, optional
    pub razorpay_key: Option<String>,
}

impl BookingConfig {
    /// Load configuration from the environment
    ///
    /// Reads a `.env` file when present. Every variable has a default
    /// pointing at the hosted services.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            identity_base_url: env::var("IDENTITY_BASE_URL").unwrap_or_else(|_| {
                "https://omg-identity-service-993414851442.asia-south1.run.app".to_string()
            }),
            payment_base_url: env::var("PAYMENT_BASE_URL").unwrap_or_else(|_| {
                "https://omg-order-and-payment-service-993414851442.asia-south1.run.app"
                    .to_string()
            }),
            app_base_url: env::var("APP_BASE_URL").unwrap_or_else(|_| {
                "https://omg-appcontrol-service-993414851442.asia-south1.run.app".to_string()
            }),
            razorpay_key: env::var("RAZORPAY_KEY").ok(),
        }
    }
}

/// Resolve the publishable key for a checkout attempt
///
/// Order of precedence: key returned with the order, configured key,
/// hardcoded test key.
#[must_use]
pub fn resolve_razorpay_key(
    from_order: Option<String>,
    configured: Option<&str>,
) -> String {
    from_order
        .filter(|key| !key.is_empty())
        .or_else(|| configured.map(ToString::to_string))
        .unwrap_or_else(|| FALLBACK_RAZORPAY_KEY.to_string())
}
