//! # Yagam Core
//!
//! Core traits and types for the Yagam booking workflows.
//!
//! This crate provides the fundamental abstractions the booking wizard and
//! registration form are built on: a Reducer pattern with explicit effects
//! and dependency injection.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a step or feature
//! - **Action**: All possible inputs to a reducer (user input, service
//!   results, timer ticks)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use yagam_core::reducer::Reducer;
//! use yagam_core::effect::Effect;
//!
//! impl Reducer for LoginReducer {
//!     type State = LoginState;
//!     type Action = LoginAction;
//!     type Environment = LoginEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut LoginState,
//!         action: LoginAction,
//!         env: &LoginEnvironment,
//!     ) -> Vec<Effect<LoginAction>> {
//!         // Business logic goes here
//!         vec![]
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Vec<Effect<Self::Action>>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and can be re-mapped into a parent
/// action type when a reducer is embedded in a larger one.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Delayed action (timer ticks, cooldowns)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action>
    where
        Action: Send + 'static,
    {
        /// Lift this effect into a parent action type
        ///
        /// Used when a step reducer is embedded in an orchestrator: the
        /// step's effects keep running, but the actions they produce are
        /// wrapped so they route back through the parent reducer.
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(future) => {
                    Effect::Future(Box::pin(async move { future.await.map(f) }))
                },
            }
        }

        /// Lift a whole batch of effects into a parent action type
        pub fn map_all<B, F>(effects: Vec<Effect<Action>>, f: F) -> Vec<Effect<B>>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + Clone + 'static,
        {
            effects.into_iter().map(|e| e.map(f.clone())).collect()
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter, so reducers stay pure and tests can
/// substitute deterministic implementations.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production uses the system clock; tests use a fixed clock so
    /// receipts and timestamps are reproducible.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// System clock backed by `Utc::now`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Persistent store for the access token issued by the identity service
    ///
    /// The token is the only piece of state that survives closing the
    /// wizard. It is injected rather than read from ambient global state
    /// so tests can substitute an in-memory store.
    pub trait SessionStore: Send + Sync {
        /// Read the stored token, if any
        fn get(&self) -> Option<String>;

        /// Persist a token
        fn set(&self, token: &str);

        /// Remove the stored token (logout / 401)
        fn clear(&self);
    }
}
