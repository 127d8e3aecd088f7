//! # Yagam Booking
//!
//! Domain logic for the Maha Yagam 2026 landing flows: the multi-step
//! Rudraksha booking wizard and the free event registration form.
//!
//! The wizard walks OTP login, booking details, payment and success,
//! orchestrated by [`wizard::WizardReducer`]. Each step is its own
//! reducer with its own state and actions, composed through
//! [`yagam_core::effect::Effect::map_all`]. Network dependencies sit
//! behind the traits in [`services`], with `reqwest`-backed
//! implementations in [`http`].
//!
//! ## Steps
//!
//! - [`login`]: OTP over WhatsApp with a 60-second resend cooldown
//! - [`details`]: the booking form, validated by [`schema`]
//! - [`payment`]: order creation, gateway checkout, verification
//! - [`success`]: summary of the verified booking
//!
//! The [`registration`] form is standalone and shares the slot model
//! and validation rules with the wizard.

pub mod config;
pub mod details;
pub mod draft;
pub mod http;
pub mod login;
pub mod payment;
pub mod registration;
pub mod schema;
pub mod services;
pub mod session;
pub mod slots;
pub mod success;
pub mod types;
pub mod wizard;

pub use config::BookingConfig;
pub use draft::{BookingDraft, RegistrationDraft};
pub use services::{
    CheckoutGateway, CheckoutOutcome, IdentityService, OrderService, RegistrationService,
    ServiceError,
};
pub use slots::{TIME_SLOTS, SlotSelection, TimeSlot};
pub use types::{Gender, Member, Notice, NoticeLevel};
pub use wizard::{WizardAction, WizardEnvironment, WizardReducer, WizardState, WizardStep};
