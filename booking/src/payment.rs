//! Payment step: order creation, gateway checkout, verification.
//!
//! `Idle → CreatingOrder → AwaitingGateway → Verifying → Verified`,
//! with `Failed` re-enterable from the pay button. Amounts are whole
//! rupees everywhere in the domain; conversion to minor units happens
//! only when handing off to the checkout widget. Each attempt
//! generates a fresh receipt from the injected clock.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use yagam_core::effect::Effect;
use yagam_core::environment::Clock;
use yagam_core::reducer::Reducer;

use crate::config::resolve_razorpay_key;
use crate::draft::BookingDraft;
use crate::services::{
    BookingPayload, CheckoutGateway, CheckoutOutcome, CheckoutRequest, CreateOrderPayload,
    CreateOrderResponse, OrderService, PaymentSignature, VerifyPaymentPayload, wire_members,
};
use crate::types::Notice;

/// Price per Rudraksha in whole rupees
pub const RUDRAKSHA_PRICE: u64 = 999;

/// Currency for every payment
pub const CURRENCY: &str = "INR";

/// Merchant display name shown by the checkout widget
const MERCHANT_NAME: &str = "Maha Yagam 2026";

/// Total amount in whole rupees for a quantity
#[must_use]
pub const fn total_amount(quantity: u32) -> u64 {
    RUDRAKSHA_PRICE * quantity as u64
}

/// Customer email synthesized from the phone number
///
/// The booking form has no email field; the payment service requires
/// one.
#[must_use]
pub fn customer_email(phone_number: &str) -> String {
    format!("{phone_number}@rudraksha.omg")
}

/// Dependencies of the payment step
#[derive(Clone)]
pub struct PaymentEnvironment {
    /// Receipt timestamps
    pub clock: Arc<dyn Clock>,
    /// Order creation and verification
    pub orders: Arc<dyn OrderService>,
    /// The checkout widget adapter
    pub gateway: Arc<dyn CheckoutGateway>,
    /// Configured publishable key, optional
    pub razorpay_key: Option<String>,
}

/// Where the payment attempt is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaymentPhase {
    /// Ready for the pay button
    #[default]
    Idle,
    /// Order request in flight
    CreatingOrder,
    /// Checkout widget open, waiting for its outcome
    AwaitingGateway,
    /// Verify request in flight
    Verifying,
    /// Payment verified, booking created
    Verified,
    /// The attempt failed; the pay button retries
    Failed {
        /// What went wrong, user-facing
        message: String,
    },
}

/// Payment step state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentState {
    /// Attempt phase
    pub phase: PaymentPhase,
    /// Backend user id of the payer
    pub user_id: String,
    /// The frozen booking draft being paid for
    pub draft: BookingDraft,
    /// Signature triple from the last completed checkout, kept for
    /// reconciliation when verification fails after the charge
    pub last_signature: Option<PaymentSignature>,
    /// Last user-facing notice
    pub notice: Option<Notice>,
}

impl PaymentState {
    /// Seed the step for a frozen draft
    #[must_use]
    pub fn for_booking(user_id: &str, draft: BookingDraft) -> Self {
        Self {
            phase: PaymentPhase::Idle,
            user_id: user_id.to_string(),
            draft,
            last_signature: None,
            notice: None,
        }
    }

    /// Total payable in whole rupees
    #[must_use]
    pub fn total(&self) -> u64 {
        total_amount(self.draft.quantity)
    }
}

/// Payment step inputs and service results
#[derive(Debug, Clone)]
pub enum PaymentAction {
    /// Pay button; also retries after a failure
    PayTapped,
    /// The order was created
    OrderCreated {
        /// The creation response, key included when provided
        response: CreateOrderResponse,
    },
    /// Order creation failed; terminal for this attempt
    OrderFailed {
        /// User-facing message
        message: String,
    },
    /// The widget completed with a signature triple
    GatewayCompleted {
        /// Signature triple for verification
        signature: PaymentSignature,
    },
    /// The widget reported a payment failure
    GatewayFailed {
        /// Gateway-provided description, may be empty
        message: String,
    },
    /// The customer closed the widget without paying
    GatewayDismissed,
    /// Verification succeeded; the booking now exists
    Verified,
    /// Verification failed after the charge attempt
    VerifyFailed {
        /// User-facing message
        message: String,
    },
}

/// Reducer for the payment step
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentReducer;

fn receipt(env: &PaymentEnvironment, user_id: &str) -> String {
    let millis = env.clock.now().timestamp_millis();
    let prefix: String = user_id.chars().take(8).collect();
    format!("rudraksha_{millis}_{prefix}")
}

fn order_payload(state: &PaymentState, env: &PaymentEnvironment) -> CreateOrderPayload {
    let draft = &state.draft;
    let mut notes = std::collections::BTreeMap::new();
    notes.insert("bookingType".to_string(), "rudraksha".to_string());
    notes.insert("quantity".to_string(), draft.quantity.to_string());
    notes.insert(
        "participatingInEvent".to_string(),
        draft.participating.to_string(),
    );
    CreateOrderPayload {
        amount: total_amount(draft.quantity),
        user_id: state.user_id.clone(),
        currency: CURRENCY.to_string(),
        receipt: receipt(env, &state.user_id),
        auto_capture: false,
        customer_email: customer_email(&draft.phone_number),
        customer_phone: draft.phone_number.clone(),
        notes,
        metadata: json!({
            "rudrakshaQuantity": draft.quantity,
            "participatingInEvent": draft.participating,
            "numberOfMembers": draft.party_size(),
            "bookingId": null,
        }),
    }
}

fn checkout_request(
    state: &PaymentState,
    response: &CreateOrderResponse,
    env: &PaymentEnvironment,
) -> CheckoutRequest {
    let draft = &state.draft;
    let plural = if draft.quantity > 1 { "s" } else { "" };
    CheckoutRequest {
        key: resolve_razorpay_key(
            response.razorpay_key.clone(),
            env.razorpay_key.as_deref(),
        ),
        amount_minor: total_amount(draft.quantity) * 100,
        currency: CURRENCY.to_string(),
        order_id: response.record.razorpay_order_id.clone(),
        name: MERCHANT_NAME.to_string(),
        description: format!(
            "Payment for {} Blessed Rudraksha{plural}",
            draft.quantity
        ),
        prefill_name: draft.full_name.clone(),
        prefill_email: customer_email(&draft.phone_number),
        prefill_contact: draft.phone_number.clone(),
    }
}

fn verify_payload(
    state: &PaymentState,
    signature: PaymentSignature,
    env: &PaymentEnvironment,
) -> VerifyPaymentPayload {
    let draft = &state.draft;
    let total = total_amount(draft.quantity);
    let first_date = draft.selection.dates.first().cloned();
    let scheduled_date = first_date
        .clone()
        .unwrap_or_else(|| env.clock.now().date_naive().to_string());
    let scheduled_timestamp = first_date.as_ref().map_or_else(
        || env.clock.now().to_rfc3339(),
        |date| format!("{date}T00:00:00Z"),
    );

    let slot_json = if draft.selection.slots.is_empty() {
        None
    } else {
        serde_json::to_string(&draft.selection.slots).ok()
    };

    VerifyPaymentPayload {
        razorpay_order_id: signature.razorpay_order_id,
        razorpay_payment_id: signature.razorpay_payment_id,
        razorpay_signature: signature.razorpay_signature,
        user_id: state.user_id.clone(),
        // The landing flow has no temple or saved address to reference
        temple_id: Uuid::nil().to_string(),
        address_id: Uuid::nil().to_string(),
        order_type: "event".to_string(),
        status: "pending".to_string(),
        scheduled_date,
        scheduled_timestamp,
        fulfillment_type: "delivery".to_string(),
        subtotal: total,
        discount_amount: 0,
        convenience_fee: 0,
        tax_amount: 0,
        total_amount: total,
        currency: CURRENCY.to_string(),
        contact_name: draft.full_name.clone(),
        contact_phone: draft.phone_number.clone(),
        contact_email: customer_email(&draft.phone_number),
        rudraksha_booking_data: Some(BookingPayload {
            user_id: state.user_id.clone(),
            full_name: draft.full_name.clone(),
            phone_number: draft.phone_number.clone(),
            address_text: draft.address_text.clone(),
            address_place_id: draft.place_id.clone(),
            address_lat: draft.lat,
            address_lng: draft.lng,
            age: draft.age,
            gender: draft
                .gender
                .map_or_else(String::new, |g| g.as_str().to_string()),
            participating_in_event: draft.participating,
            preferred_date: first_date,
            preferred_time_slot: slot_json,
            number_of_people: Some(draft.party_size()),
            members: if draft.members.is_empty() {
                None
            } else {
                Some(wire_members(&draft.members))
            },
            rudraksha_quantity: draft.quantity,
        }),
    }
}

impl Reducer for PaymentReducer {
    type State = PaymentState;
    type Action = PaymentAction;
    type Environment = PaymentEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>> {
        match action {
            PaymentAction::PayTapped => {
                // Disabled while any request or the widget is active
                if !matches!(state.phase, PaymentPhase::Idle | PaymentPhase::Failed { .. }) {
                    return vec![];
                }
                state.phase = PaymentPhase::CreatingOrder;
                let orders = Arc::clone(&env.orders);
                let payload = order_payload(state, env);
                vec![Effect::Future(Box::pin(async move {
                    match orders.create_order(payload).await {
                        Ok(response) => {
                            if response.record.razorpay_order_id.is_empty() {
                                Some(PaymentAction::OrderFailed {
                                    message: "Razorpay order ID not received".to_string(),
                                })
                            } else {
                                Some(PaymentAction::OrderCreated { response })
                            }
                        },
                        Err(error) => Some(PaymentAction::OrderFailed {
                            message: error
                                .server_message()
                                .unwrap_or("Failed to create payment order")
                                .to_string(),
                        }),
                    }
                }))]
            },

            PaymentAction::OrderCreated { response } => {
                if !matches!(state.phase, PaymentPhase::CreatingOrder) {
                    return vec![];
                }
                state.phase = PaymentPhase::AwaitingGateway;
                let gateway = Arc::clone(&env.gateway);
                let request = checkout_request(state, &response, env);
                vec![Effect::Future(Box::pin(async move {
                    match gateway.open(request).await {
                        Ok(CheckoutOutcome::Completed(signature)) => {
                            Some(PaymentAction::GatewayCompleted { signature })
                        },
                        Ok(CheckoutOutcome::Failed { description }) => {
                            Some(PaymentAction::GatewayFailed {
                                message: description,
                            })
                        },
                        Ok(CheckoutOutcome::Dismissed) => Some(PaymentAction::GatewayDismissed),
                        Err(error) => Some(PaymentAction::GatewayFailed {
                            message: error.to_string(),
                        }),
                    }
                }))]
            },

            PaymentAction::OrderFailed { message } => {
                state.notice = Some(Notice::error("Payment Error", &message));
                state.phase = PaymentPhase::Failed { message };
                vec![]
            },

            PaymentAction::GatewayCompleted { signature } => {
                if !matches!(state.phase, PaymentPhase::AwaitingGateway) {
                    return vec![];
                }
                state.phase = PaymentPhase::Verifying;
                state.last_signature = Some(signature.clone());
                let orders = Arc::clone(&env.orders);
                let payload = verify_payload(state, signature, env);
                vec![Effect::Future(Box::pin(async move {
                    match orders.verify_payment(payload).await {
                        Ok(_) => Some(PaymentAction::Verified),
                        Err(error) => Some(PaymentAction::VerifyFailed {
                            message: error
                                .server_message()
                                .unwrap_or("Payment verification failed")
                                .to_string(),
                        }),
                    }
                }))]
            },

            PaymentAction::GatewayFailed { message } => {
                let description = if message.is_empty() {
                    "Payment could not be processed".to_string()
                } else {
                    message
                };
                state.notice = Some(Notice::error("Payment Failed", &description));
                state.phase = PaymentPhase::Failed {
                    message: description,
                };
                vec![]
            },

            PaymentAction::GatewayDismissed => {
                state.phase = PaymentPhase::Idle;
                state.notice = Some(Notice::info(
                    "Payment Cancelled",
                    "You cancelled the payment process",
                ));
                vec![]
            },

            PaymentAction::Verified => {
                state.phase = PaymentPhase::Verified;
                state.notice = Some(Notice::info(
                    "Payment Verified!",
                    "Your payment has been verified successfully",
                ));
                vec![]
            },

            PaymentAction::VerifyFailed { message } => {
                state.notice = Some(Notice::error("Payment Processing Error", &message));
                state.phase = PaymentPhase::Failed { message };
                vec![]
            },
        }
    }
}
