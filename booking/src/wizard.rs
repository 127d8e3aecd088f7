//! Booking wizard orchestrator.
//!
//! Composes the login, details and payment step reducers and owns the
//! step transitions between them. Opening the wizard resolves a stored
//! token into a profile so returning visitors skip the login step;
//! closing it resets every step to its initial state, with only the
//! persisted token surviving in the session store.

use std::sync::Arc;

use yagam_core::effect::Effect;
use yagam_core::environment::{Clock, SessionStore};
use yagam_core::reducer::Reducer;

use crate::details::{DetailsAction, DetailsReducer, DetailsState};
use crate::draft::BookingDraft;
use crate::login::{LoginAction, LoginEnvironment, LoginReducer, LoginState};
use crate::payment::{
    PaymentAction, PaymentEnvironment, PaymentPhase, PaymentReducer, PaymentState,
};
use crate::services::{
    CheckoutGateway, IdentityService, OrderService, ServiceError, UserProfile,
};
use crate::session::strip_country_code;
use crate::types::Notice;

/// Which step the wizard shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WizardStep {
    /// OTP login
    #[default]
    Login,
    /// Booking details form
    Details,
    /// Order creation and checkout
    Payment,
    /// Verified payment confirmation
    Success,
}

/// Dependencies of the whole wizard
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Receipt timestamps
    pub clock: Arc<dyn Clock>,
    /// OTP identity service
    pub identity: Arc<dyn IdentityService>,
    /// Order creation and verification
    pub orders: Arc<dyn OrderService>,
    /// The checkout widget adapter
    pub gateway: Arc<dyn CheckoutGateway>,
    /// Token persistence
    pub session: Arc<dyn SessionStore>,
    /// Configured publishable key, optional
    pub razorpay_key: Option<String>,
}

impl WizardEnvironment {
    fn login_env(&self) -> LoginEnvironment {
        LoginEnvironment {
            identity: Arc::clone(&self.identity),
            session: Arc::clone(&self.session),
        }
    }

    fn payment_env(&self) -> PaymentEnvironment {
        PaymentEnvironment {
            clock: Arc::clone(&self.clock),
            orders: Arc::clone(&self.orders),
            gateway: Arc::clone(&self.gateway),
            razorpay_key: self.razorpay_key.clone(),
        }
    }
}

/// Wizard state: current step plus every step's own state
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    /// Step currently shown
    pub step: WizardStep,
    /// A stored token is being resolved into a profile
    pub resolving: bool,
    /// Login step state
    pub login: LoginState,
    /// Details step state
    pub details: DetailsState,
    /// Payment step state
    pub payment: PaymentState,
    /// Verified phone in 10-digit local form
    pub phone_number: String,
    /// Backend user id, set once identity is established
    pub user_id: Option<String>,
    /// The frozen booking carried from details to payment
    pub booking: Option<BookingDraft>,
    /// Last orchestrator-level notice
    pub notice: Option<Notice>,
}

/// Wizard inputs: lifecycle, session resolution and child actions
#[derive(Debug)]
pub enum WizardAction {
    /// The wizard dialog was opened
    Opened,
    /// The stored token resolved to a profile
    SessionResolved {
        /// The authenticated user's profile
        profile: UserProfile,
    },
    /// The stored token was rejected (401)
    SessionInvalid,
    /// Profile resolution failed for a non-auth reason; the token is
    /// kept and the visitor logs in manually
    SessionUnavailable,
    /// Back navigation from details to login
    BackToLogin,
    /// Back navigation from payment to details
    BackToDetails,
    /// The wizard dialog was closed
    Closed,
    /// Login step action
    Login(LoginAction),
    /// Details step action
    Details(DetailsAction),
    /// Payment step action
    Payment(PaymentAction),
}

/// Reducer composing the three step reducers
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardReducer {
    login: LoginReducer,
    details: DetailsReducer,
    payment: PaymentReducer,
}

fn resolve_session_effect(env: &WizardEnvironment) -> Effect<WizardAction> {
    let identity = Arc::clone(&env.identity);
    Effect::Future(Box::pin(async move {
        match identity.current_user().await {
            Ok(profile) => Some(WizardAction::SessionResolved { profile }),
            Err(ServiceError::Unauthorized { .. }) => Some(WizardAction::SessionInvalid),
            Err(_) => Some(WizardAction::SessionUnavailable),
        }
    }))
}

impl WizardReducer {
    fn enter_details(&self, state: &mut WizardState, user_id: String, profile: Option<&UserProfile>) {
        state.user_id = Some(user_id);
        state.details = DetailsState {
            draft: BookingDraft::for_phone(&state.phone_number),
            ..DetailsState::default()
        };
        if let Some(profile) = profile {
            state.details.draft.prefill(
                &profile.full_name(),
                profile.address.as_deref().unwrap_or_default(),
            );
        }
        state.step = WizardStep::Details;
    }

    fn enter_payment(&self, state: &mut WizardState, frozen: BookingDraft) {
        let user_id = state.user_id.clone().unwrap_or_default();
        state.booking = Some(frozen.clone());
        state.payment = PaymentState::for_booking(&user_id, frozen);
        state.step = WizardStep::Payment;
        state.notice = Some(Notice::info(
            "Details Saved",
            "You can now proceed to payment",
        ));
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>> {
        match action {
            WizardAction::Opened => {
                // A resolve request is already in flight
                if state.resolving {
                    return vec![];
                }
                if env.session.get().is_none() {
                    state.step = WizardStep::Login;
                    return vec![];
                }
                state.resolving = true;
                vec![resolve_session_effect(env)]
            },

            WizardAction::SessionResolved { profile } => {
                state.resolving = false;
                state.phone_number = strip_country_code(&profile.phone_number);
                self.enter_details(state, profile.id.clone(), Some(&profile));
                vec![]
            },

            WizardAction::SessionInvalid => {
                state.resolving = false;
                env.session.clear();
                state.step = WizardStep::Login;
                state.notice = Some(Notice::error(
                    "Session expired",
                    "Please verify your mobile number again to continue.",
                ));
                vec![]
            },

            WizardAction::SessionUnavailable => {
                state.resolving = false;
                state.step = WizardStep::Login;
                vec![]
            },

            WizardAction::BackToLogin => {
                if matches!(state.step, WizardStep::Details) {
                    state.step = WizardStep::Login;
                }
                vec![]
            },

            WizardAction::BackToDetails => {
                // Not while a payment request or the widget is active
                if matches!(state.step, WizardStep::Payment)
                    && matches!(
                        state.payment.phase,
                        PaymentPhase::Idle | PaymentPhase::Failed { .. }
                    )
                {
                    state.step = WizardStep::Details;
                }
                vec![]
            },

            WizardAction::Closed => {
                *state = WizardState::default();
                vec![]
            },

            WizardAction::Login(action) => {
                let verified = matches!(action, LoginAction::VerifySucceeded { .. });
                let effects = self.login.reduce(&mut state.login, action, &env.login_env());
                if verified {
                    if let Some(session) = state.login.verified.clone() {
                        state.phone_number = session.phone_number;
                        self.enter_details(state, session.user_id, None);
                    }
                }
                Effect::map_all(effects, WizardAction::Login)
            },

            WizardAction::Details(action) => {
                let submitted = matches!(action, DetailsAction::SubmitTapped);
                let effects = self.details.reduce(&mut state.details, action, &());
                if submitted {
                    if let Some(frozen) = state.details.submitted.take() {
                        self.enter_payment(state, frozen);
                    }
                }
                Effect::map_all(effects, WizardAction::Details)
            },

            WizardAction::Payment(action) => {
                let verified = matches!(action, PaymentAction::Verified);
                let effects =
                    self.payment
                        .reduce(&mut state.payment, action, &env.payment_env());
                // Failures keep the payment step visible for a retry
                if verified && matches!(state.payment.phase, PaymentPhase::Verified) {
                    state.step = WizardStep::Success;
                }
                Effect::map_all(effects, WizardAction::Payment)
            },
        }
    }
}
