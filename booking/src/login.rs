//! OTP login step.
//!
//! `Idle → OtpSent → Verifying → Verified`, with a 60-second resend
//! cooldown driven by one-second delay ticks. The phone number is
//! validated locally before any network call, and an OTP shorter than
//! four digits is rejected without a request. On success the access
//! token is persisted through the session store inside the effect, so
//! the reducer itself never touches storage.

use std::sync::Arc;
use std::time::Duration;

use yagam_core::effect::Effect;
use yagam_core::environment::SessionStore;
use yagam_core::reducer::Reducer;

use crate::services::IdentityService;
use crate::session::{Session, is_valid_mobile, sanitize_mobile_input};
use crate::types::Notice;

/// Seconds before the OTP may be resent
pub const RESEND_COOLDOWN_SECS: u32 = 60;

/// Minimum accepted OTP length
const MIN_OTP_LEN: usize = 4;

/// Dependencies of the login step
#[derive(Clone)]
pub struct LoginEnvironment {
    /// OTP identity service
    pub identity: Arc<dyn IdentityService>,
    /// Token persistence
    pub session: Arc<dyn SessionStore>,
}

/// Where the step is in the OTP exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginPhase {
    /// Nothing sent yet
    #[default]
    Idle,
    /// OTP request in flight
    SendingOtp,
    /// OTP delivered, waiting for the code
    OtpSent,
    /// Verify request in flight
    Verifying,
    /// Identity established
    Verified,
}

/// Login step state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginState {
    /// Phone input, sanitized to at most 10 digits
    pub phone: String,
    /// OTP input
    pub otp: String,
    /// Exchange phase
    pub phase: LoginPhase,
    /// An OTP has been sent at least once (switches the button label
    /// to resend)
    pub otp_sent: bool,
    /// Seconds left before resend is allowed
    pub cooldown: u32,
    /// Identity established by verification
    pub verified: Option<Session>,
    /// Last user-facing notice
    pub notice: Option<Notice>,
}

/// Login step inputs and service results
#[derive(Debug, Clone)]
pub enum LoginAction {
    /// Phone input keystroke
    PhoneChanged(String),
    /// OTP input keystroke
    OtpChanged(String),
    /// Send / resend button
    SendOtpTapped,
    /// The OTP request succeeded
    OtpSendSucceeded,
    /// The OTP request failed
    OtpSendFailed {
        /// User-facing message, empty for generic handling
        message: String,
    },
    /// One second of the resend cooldown elapsed
    CooldownTick,
    /// Verify button
    VerifyTapped,
    /// Verification succeeded; the token is already persisted
    VerifySucceeded {
        /// Backend user id
        user_id: String,
    },
    /// Verification failed
    VerifyFailed {
        /// User-facing message, empty for generic handling
        message: String,
    },
}

/// Reducer for the login step
#[derive(Debug, Clone, Copy, Default)]
pub struct LoginReducer;

impl LoginReducer {
    fn send_otp_effect(state: &LoginState, env: &LoginEnvironment) -> Effect<LoginAction> {
        let identity = Arc::clone(&env.identity);
        let phone = state.phone.clone();
        Effect::Future(Box::pin(async move {
            match identity.send_otp(&phone).await {
                Ok(()) => Some(LoginAction::OtpSendSucceeded),
                Err(error) => Some(LoginAction::OtpSendFailed {
                    message: error.server_message().unwrap_or_default().to_string(),
                }),
            }
        }))
    }

    fn verify_effect(state: &LoginState, env: &LoginEnvironment) -> Effect<LoginAction> {
        let identity = Arc::clone(&env.identity);
        let session = Arc::clone(&env.session);
        let phone = state.phone.clone();
        let otp = state.otp.clone();
        Effect::Future(Box::pin(async move {
            match identity.verify_otp(&phone, &otp).await {
                Ok(verified) => {
                    session.set(&verified.access_token);
                    Some(LoginAction::VerifySucceeded {
                        user_id: verified.user_id,
                    })
                },
                Err(error) => Some(LoginAction::VerifyFailed {
                    message: error.server_message().unwrap_or_default().to_string(),
                }),
            }
        }))
    }

    fn tick_effect() -> Effect<LoginAction> {
        Effect::Delay {
            duration: Duration::from_secs(1),
            action: Box::new(LoginAction::CooldownTick),
        }
    }
}

impl Reducer for LoginReducer {
    type State = LoginState;
    type Action = LoginAction;
    type Environment = LoginEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Vec<Effect<Self::Action>> {
        match action {
            LoginAction::PhoneChanged(input) => {
                state.phone = sanitize_mobile_input(&state.phone, &input);
                vec![]
            },

            LoginAction::OtpChanged(input) => {
                state.otp = input.chars().take(6).collect();
                vec![]
            },

            LoginAction::SendOtpTapped => {
                // Disabled while a request is in flight or during cooldown
                if matches!(state.phase, LoginPhase::SendingOtp | LoginPhase::Verifying)
                    || state.cooldown > 0
                {
                    return vec![];
                }
                if !is_valid_mobile(&state.phone) {
                    state.notice = Some(Notice::error(
                        "Invalid phone number",
                        "Please enter a valid 10-digit phone number starting with 6, 7, 8, or 9",
                    ));
                    return vec![];
                }
                state.phase = LoginPhase::SendingOtp;
                vec![Self::send_otp_effect(state, env)]
            },

            LoginAction::OtpSendSucceeded => {
                state.phase = LoginPhase::OtpSent;
                state.otp_sent = true;
                state.cooldown = RESEND_COOLDOWN_SECS;
                state.notice = Some(Notice::info(
                    "OTP Sent!",
                    "Please enter the OTP sent to your phone",
                ));
                vec![Self::tick_effect()]
            },

            LoginAction::OtpSendFailed { message } => {
                state.phase = if state.otp_sent {
                    LoginPhase::OtpSent
                } else {
                    LoginPhase::Idle
                };
                let description = if message.is_empty() {
                    "Something went wrong".to_string()
                } else {
                    message
                };
                state.notice = Some(Notice::error("Error", &description));
                vec![]
            },

            LoginAction::CooldownTick => {
                if state.cooldown == 0 {
                    return vec![];
                }
                state.cooldown -= 1;
                if state.cooldown > 0 {
                    vec![Self::tick_effect()]
                } else {
                    vec![]
                }
            },

            LoginAction::VerifyTapped => {
                if !matches!(state.phase, LoginPhase::OtpSent) {
                    return vec![];
                }
                if state.otp.len() < MIN_OTP_LEN {
                    state.notice =
                        Some(Notice::error("Invalid OTP", "Please enter a valid OTP"));
                    return vec![];
                }
                state.phase = LoginPhase::Verifying;
                vec![Self::verify_effect(state, env)]
            },

            LoginAction::VerifySucceeded { user_id } => {
                state.phase = LoginPhase::Verified;
                state.verified = Some(Session {
                    phone_number: state.phone.trim().to_string(),
                    user_id,
                });
                state.notice = Some(Notice::info(
                    "OTP Verified!",
                    "You can now proceed to the next step",
                ));
                vec![]
            },

            LoginAction::VerifyFailed { message } => {
                state.phase = LoginPhase::OtpSent;
                let description = if message.is_empty() {
                    "Something went wrong".to_string()
                } else {
                    message
                };
                state.notice = Some(Notice::error("Error", &description));
                vec![]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::services::{ServiceError, ServiceFuture, UserProfile, VerifiedSession};
    use yagam_testing::{MemorySessionStore, ReducerTest, assertions};

    struct StubIdentity {
        verify: Result<VerifiedSession, ServiceError>,
    }

    impl StubIdentity {
        fn ok() -> Self {
            Self {
                verify: Ok(VerifiedSession {
                    access_token: "token-1".to_string(),
                    user_id: "user-1".to_string(),
                }),
            }
        }
    }

    impl crate::services::IdentityService for StubIdentity {
        fn send_otp(&self, _phone_number: &str) -> ServiceFuture<()> {
            Box::pin(async { Ok(()) })
        }

        fn verify_otp(&self, _phone_number: &str, _otp: &str) -> ServiceFuture<VerifiedSession> {
            let result = self.verify.clone();
            Box::pin(async move { result })
        }

        fn current_user(&self) -> ServiceFuture<UserProfile> {
            Box::pin(async {
                Err(ServiceError::Unauthorized {
                    message: String::new(),
                })
            })
        }
    }

    fn env() -> LoginEnvironment {
        LoginEnvironment {
            identity: Arc::new(StubIdentity::ok()),
            session: Arc::new(MemorySessionStore::new()),
        }
    }

    fn state_with_phone(phone: &str) -> LoginState {
        LoginState {
            phone: phone.to_string(),
            ..LoginState::default()
        }
    }

    #[test]
    fn phone_input_is_sanitized() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(LoginState::default())
            .when_action(LoginAction::PhoneChanged("98-76 543".to_string()))
            .then_state(|state| assert_eq!(state.phone, "9876543"))
            .run();
    }

    #[test]
    fn invalid_phone_is_rejected_locally() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(state_with_phone("987654321"))
            .when_action(LoginAction::SendOtpTapped)
            .then_state(|state| {
                assert_eq!(state.phase, LoginPhase::Idle);
                assert_eq!(
                    state.notice.as_ref().unwrap().title,
                    "Invalid phone number"
                );
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn send_starts_a_request() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(state_with_phone("9876543210"))
            .when_action(LoginAction::SendOtpTapped)
            .then_state(|state| assert_eq!(state.phase, LoginPhase::SendingOtp))
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn send_success_starts_cooldown() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(LoginState {
                phase: LoginPhase::SendingOtp,
                ..state_with_phone("9876543210")
            })
            .when_action(LoginAction::OtpSendSucceeded)
            .then_state(|state| {
                assert_eq!(state.phase, LoginPhase::OtpSent);
                assert_eq!(state.cooldown, RESEND_COOLDOWN_SECS);
            })
            .then_effects(|effects| assertions::assert_has_delay_effect(effects))
            .run();
    }

    #[test]
    fn resend_is_disabled_until_sixty_ticks_elapse() {
        let mut state = LoginState {
            phase: LoginPhase::SendingOtp,
            ..state_with_phone("9876543210")
        };
        let env = env();
        let reducer = LoginReducer;

        reducer.reduce(&mut state, LoginAction::OtpSendSucceeded, &env);
        assert_eq!(state.cooldown, 60);

        for expected in (0..60).rev() {
            // Resend must stay disabled while the cooldown is running
            if expected > 0 {
                let effects = reducer.reduce(&mut state, LoginAction::SendOtpTapped, &env);
                assert!(effects.is_empty());
                assert_eq!(state.phase, LoginPhase::OtpSent);
            }
            reducer.reduce(&mut state, LoginAction::CooldownTick, &env);
            assert_eq!(state.cooldown, expected);
        }

        // Cooldown over: resend goes through again
        let effects = reducer.reduce(&mut state, LoginAction::SendOtpTapped, &env);
        assert_eq!(effects.len(), 1);
        assert_eq!(state.phase, LoginPhase::SendingOtp);
    }

    #[test]
    fn short_otp_is_rejected_locally() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(LoginState {
                phase: LoginPhase::OtpSent,
                otp: "123".to_string(),
                ..state_with_phone("9876543210")
            })
            .when_action(LoginAction::VerifyTapped)
            .then_state(|state| {
                assert_eq!(state.phase, LoginPhase::OtpSent);
                assert_eq!(state.notice.as_ref().unwrap().title, "Invalid OTP");
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn verify_effect_persists_the_token() {
        let session = Arc::new(MemorySessionStore::new());
        let env = LoginEnvironment {
            identity: Arc::new(StubIdentity::ok()),
            session: Arc::clone(&session) as Arc<dyn SessionStore>,
        };
        let mut state = LoginState {
            phase: LoginPhase::OtpSent,
            otp: "1234".to_string(),
            ..state_with_phone("9876543210")
        };

        let mut effects = LoginReducer.reduce(&mut state, LoginAction::VerifyTapped, &env);
        assert_eq!(state.phase, LoginPhase::Verifying);
        let action = match effects.remove(0) {
            Effect::Future(future) => future.await.unwrap(),
            other => panic!("expected future effect, got {other:?}"),
        };

        assert_eq!(session.get(), Some("token-1".to_string()));

        LoginReducer.reduce(&mut state, action, &env);
        assert_eq!(state.phase, LoginPhase::Verified);
        let verified = state.verified.unwrap();
        assert_eq!(verified.phone_number, "9876543210");
        assert_eq!(verified.user_id, "user-1");
    }

    #[test]
    fn verify_failure_surfaces_server_message() {
        ReducerTest::new(LoginReducer)
            .with_env(env())
            .given_state(LoginState {
                phase: LoginPhase::Verifying,
                ..state_with_phone("9876543210")
            })
            .when_action(LoginAction::VerifyFailed {
                message: "Invalid OTP entered".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, LoginPhase::OtpSent);
                assert_eq!(
                    state.notice.as_ref().unwrap().message,
                    "Invalid OTP entered"
                );
            })
            .run();
    }
}
