//! Service adapter traits and wire types.
//!
//! Every network dependency of the wizard sits behind one of these
//! traits so reducers stay pure and tests can substitute mocks. The
//! payload shapes mirror the backend's JSON contracts, camelCase
//! except the `razorpay_*` signature triple which the gateway fixes.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Member;

/// Result alias for service calls
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Boxed future returned by service trait methods
pub type ServiceFuture<T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send>>;

/// Error taxonomy for the backend services
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The stored token was rejected (HTTP 401)
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Server-provided message, may be empty
        message: String,
    },
    /// Any other non-success HTTP status
    #[error("service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Server-provided message, may be empty
        message: String,
    },
    /// Connection, DNS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Server message worth showing to the user, if any
    ///
    /// Only 400 and 401 responses carry messages written for end
    /// users; everything else gets a generic fallback.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { message } | Self::Api { status: 400, message } => {
                if message.is_empty() {
                    None
                } else {
                    Some(message)
                }
            },
            _ => None,
        }
    }
}

// --- Identity service -------------------------------------------------

/// OTP delivery channel
pub const OTP_CHANNEL: &str = "whatsapp";

/// OTP template identifier
pub const OTP_TEMPLATE_ID: &str = "SEND_OTP";

/// Request body for sending an OTP
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    /// Phone in `+91` wire form
    pub phone_number: String,
    /// OTP template
    pub template_id: String,
    /// Delivery channel
    pub channel: String,
}

/// Request body for verifying an OTP
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    /// Phone in `+91` wire form
    pub phone_number: String,
    /// The code as entered
    pub otp: String,
    /// Delivery channel
    pub channel: String,
}

/// Token and user id issued on successful verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    /// Bearer token for subsequent calls
    pub access_token: String,
    /// Backend user id
    pub user_id: String,
}

/// The authenticated user's profile
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Backend user id
    pub id: String,
    /// Phone in wire form, usually `+91`-prefixed
    #[serde(default)]
    pub phone_number: String,
    /// Preferred display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Stored address text
    #[serde(default)]
    pub address: Option<String>,
}

impl UserProfile {
    /// Best available full name: display name, else first + last
    #[must_use]
    pub fn full_name(&self) -> String {
        if let Some(display) = self.display_name.as_deref() {
            if !display.trim().is_empty() {
                return display.to_string();
            }
        }
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

/// OTP identity service
pub trait IdentityService: Send + Sync {
    /// Send an OTP to the given 10-digit phone number
    fn send_otp(&self, phone_number: &str) -> ServiceFuture<()>;

    /// Verify an OTP, yielding a token and user id
    fn verify_otp(&self, phone_number: &str, otp: &str) -> ServiceFuture<VerifiedSession>;

    /// Resolve the profile behind the stored token
    fn current_user(&self) -> ServiceFuture<UserProfile>;
}

// --- Order and payment service ---------------------------------------

/// Request body for creating a payment order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    /// Amount in whole rupees
    pub amount: u64,
    /// Backend user id
    pub user_id: String,
    /// ISO currency code
    pub currency: String,
    /// Client-generated receipt identifier
    pub receipt: String,
    /// Whether the gateway captures automatically
    pub auto_capture: bool,
    /// Customer email
    pub customer_email: String,
    /// Customer phone, 10-digit local form
    pub customer_phone: String,
    /// Free-form string notes
    pub notes: BTreeMap<String, String>,
    /// Structured metadata
    pub metadata: serde_json::Value,
}

/// Persisted order record returned by the payment service
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Record id
    pub id: i64,
    /// Backend user id
    #[serde(default)]
    pub user_id: String,
    /// Gateway order id, empty when the gateway rejected the order
    #[serde(default)]
    pub razorpay_order_id: String,
    /// Gateway payment id, set after capture
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    /// Order status
    #[serde(default)]
    pub status: String,
    /// Amount in whole rupees
    #[serde(default)]
    pub amount: u64,
    /// ISO currency code
    #[serde(default)]
    pub currency: String,
    /// Receipt identifier echoed back
    #[serde(default)]
    pub receipt: String,
}

/// Response to order creation
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// The persisted order record
    pub record: OrderRecord,
    /// Publishable gateway key, when the backend provides one
    #[serde(default)]
    pub razorpay_key: Option<String>,
}

/// Member entry in the wire booking payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberPayload {
    /// Member name
    #[serde(rename = "idName")]
    pub name: String,
    /// Member age
    #[serde(rename = "idAge", skip_serializing_if = "Option::is_none", default)]
    pub age: Option<u32>,
    /// Member gender in wire form
    #[serde(rename = "idGender")]
    pub gender: String,
}

/// Convert draft members to their wire form
#[must_use]
pub fn wire_members(members: &[Member]) -> Vec<MemberPayload> {
    members
        .iter()
        .map(|member| MemberPayload {
            name: member.name.clone(),
            age: member.age,
            gender: member
                .gender
                .map_or_else(String::new, |g| g.as_str().to_string()),
        })
        .collect()
}

/// Booking data embedded in the verify call
///
/// Verification and booking creation are a single request: the backend
/// creates the booking only after the signature checks out.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    /// Backend user id
    pub user_id: String,
    /// Registrant's full name
    pub full_name: String,
    /// Phone, 10-digit local form
    pub phone_number: String,
    /// Combined address string
    pub address_text: String,
    /// Autocomplete place id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_place_id: Option<String>,
    /// Autocomplete latitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_lat: Option<f64>,
    /// Autocomplete longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_lng: Option<f64>,
    /// Registrant's age
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Registrant's gender in wire form
    pub gender: String,
    /// Whether the registrant attends in person
    pub participating_in_event: bool,
    /// First selected date, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    /// Slot map serialized as a JSON string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time_slot: Option<String>,
    /// Party size including the registrant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_people: Option<u32>,
    /// Party members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberPayload>>,
    /// Rudraksha quantity
    pub rudraksha_quantity: u32,
}

/// Request body for payment verification
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentPayload {
    /// Gateway order id, snake_case on the wire
    #[serde(rename = "razorpay_order_id")]
    pub razorpay_order_id: String,
    /// Gateway payment id, snake_case on the wire
    #[serde(rename = "razorpay_payment_id")]
    pub razorpay_payment_id: String,
    /// Gateway signature, snake_case on the wire
    #[serde(rename = "razorpay_signature")]
    pub razorpay_signature: String,
    /// Backend user id
    pub user_id: String,
    /// Temple id, zero uuid when unknown
    pub temple_id: String,
    /// Address id, zero uuid when unknown
    pub address_id: String,
    /// Order type discriminator
    pub order_type: String,
    /// Initial order status
    pub status: String,
    /// Scheduled date, `YYYY-MM-DD`
    pub scheduled_date: String,
    /// Scheduled timestamp, RFC 3339
    pub scheduled_timestamp: String,
    /// Fulfillment type
    pub fulfillment_type: String,
    /// Subtotal in whole rupees
    pub subtotal: u64,
    /// Discount in whole rupees
    pub discount_amount: u64,
    /// Convenience fee in whole rupees
    pub convenience_fee: u64,
    /// Tax in whole rupees
    pub tax_amount: u64,
    /// Total in whole rupees
    pub total_amount: u64,
    /// ISO currency code
    pub currency: String,
    /// Contact name
    pub contact_name: String,
    /// Contact phone, 10-digit local form
    pub contact_phone: String,
    /// Contact email
    pub contact_email: String,
    /// Embedded booking data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rudraksha_booking_data: Option<BookingPayload>,
}

/// Response to payment verification
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct VerifyPaymentResponse {
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// The verified order record
    pub order: OrderRecord,
}

/// Payment order service
pub trait OrderService: Send + Sync {
    /// Create a payment order with the gateway
    fn create_order(&self, payload: CreateOrderPayload) -> ServiceFuture<CreateOrderResponse>;

    /// Verify a completed payment and create the booking
    fn verify_payment(&self, payload: VerifyPaymentPayload) -> ServiceFuture<VerifyPaymentResponse>;
}

// --- Checkout gateway -------------------------------------------------

/// Options handed to the checkout widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    /// Publishable gateway key
    pub key: String,
    /// Amount in minor units (paise)
    pub amount_minor: u64,
    /// ISO currency code
    pub currency: String,
    /// Gateway order id
    pub order_id: String,
    /// Merchant display name
    pub name: String,
    /// Line item description
    pub description: String,
    /// Prefilled customer name
    pub prefill_name: String,
    /// Prefilled customer email
    pub prefill_email: String,
    /// Prefilled customer phone
    pub prefill_contact: String,
}

/// Signature triple produced by a completed checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSignature {
    /// Gateway order id
    pub razorpay_order_id: String,
    /// Gateway payment id
    pub razorpay_payment_id: String,
    /// Gateway signature over order and payment ids
    pub razorpay_signature: String,
}

/// How a checkout attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The customer paid; signature triple for verification
    Completed(PaymentSignature),
    /// The gateway reported a failure
    Failed {
        /// Gateway-provided description
        description: String,
    },
    /// The customer closed the widget without paying
    Dismissed,
}

/// The third-party checkout widget, behind an adapter
///
/// `open` resolves exactly once per call: completion, failure, or
/// dismissal.
pub trait CheckoutGateway: Send + Sync {
    /// Open the checkout widget and wait for its single outcome
    fn open(&self, request: CheckoutRequest) -> ServiceFuture<CheckoutOutcome>;
}

// --- Free registration ------------------------------------------------

/// Request body for the free event registration
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    /// Registrant's full name
    pub full_name: String,
    /// Phone number as typed
    pub phone_number: String,
    /// Registrant's age
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Registrant's gender in wire form
    pub gender: String,
    /// Selected dates
    pub preferred_date: Vec<String>,
    /// Selected slot ids per date
    pub preferred_time_slot: BTreeMap<String, Vec<String>>,
    /// Party size including the registrant
    pub number_of_people: u32,
    /// Combined address string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_text: Option<String>,
    /// Party members
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<MemberPayload>>,
}

/// Free event registration service
pub trait RegistrationService: Send + Sync {
    /// Submit a free registration
    fn register(&self, payload: RegistrationPayload) -> ServiceFuture<()>;
}
