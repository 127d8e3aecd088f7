//! # Yagam Testing
//!
//! Testing utilities for the Yagam booking workflows.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - Assertion helpers for reducer effects
//! - The `ReducerTest` fluent harness
//!
//! ## Example
//!
//! ```ignore
//! use yagam_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(LoginReducer)
//!     .with_env(test_environment())
//!     .given_state(LoginState::default())
//!     .when_action(LoginAction::PhoneChanged("9876543210".into()))
//!     .then_state(|state| assert_eq!(state.phone, "9876543210"))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use yagam_core::environment::{Clock, SessionStore};

mod reducer_test;

/// Mock implementations for testing.
pub mod mocks {
    use std::sync::Mutex;

    use super::{Clock, DateTime, SessionStore, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible. Payment
    /// receipts embed a timestamp, so tests pin it here.
    ///
    /// # Example
    ///
    /// ```
    /// use yagam_testing::mocks::FixedClock;
    /// use yagam_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory session store
    ///
    /// Stands in for the persistent token store so tests can start with or
    /// without a stored token and inspect what the reducers wrote.
    #[derive(Debug, Default)]
    pub struct MemorySessionStore {
        token: Mutex<Option<String>>,
    }

    impl MemorySessionStore {
        /// Create an empty store (no stored token)
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store that already holds a token
        #[must_use]
        pub fn with_token(token: &str) -> Self {
            Self {
                token: Mutex::new(Some(token.to_string())),
            }
        }
    }

    impl SessionStore for MemorySessionStore {
        fn get(&self) -> Option<String> {
            match self.token.lock() {
                Ok(guard) => guard.clone(),
                Err(poisoned) => poisoned.into_inner().clone(),
            }
        }

        fn set(&self, token: &str) {
            match self.token.lock() {
                Ok(mut guard) => *guard = Some(token.to_string()),
                Err(poisoned) => *poisoned.into_inner() = Some(token.to_string()),
            }
        }

        fn clear(&self) {
            match self.token.lock() {
                Ok(mut guard) => *guard = None,
                Err(poisoned) => *poisoned.into_inner() = None,
            }
        }
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, MemorySessionStore, test_clock};
pub use reducer_test::{ReducerTest, assertions};
