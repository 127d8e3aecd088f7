//! # Yagam Runtime
//!
//! Runtime implementation for the Yagam booking workflows.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions sequentially and
//!   feeds actions back to the reducer
//!
//! The booking wizard is a single-user, event-driven UI flow: all
//! asynchronous work (OTP send/verify, session resolution, order creation,
//! payment verification) is a sequential request/await with no overlap.
//! `send` therefore drains `Effect::Future`s inline, in order, rather than
//! spawning them. Only `Effect::Delay` (timer ticks) runs on a background
//! task, and any action arriving after `close()` is dropped so an in-flight
//! callback can never mutate state once the wizard is closed.
//!
//! ## Example
//!
//! ```ignore
//! use yagam_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use yagam_core::{effect::Effect, reducer::Reducer};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// The store has been closed and no longer accepts actions
        ///
        /// Returned by `send()` after `close()`. Reopen the store before
        /// sending again.
        #[error("store is closed")]
        Closed,
    }
}

pub use error::StoreError;

struct Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: RwLock<S>,
    reducer: R,
    environment: E,
    closed: AtomicBool,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` for concurrent access)
/// 2. Reducer (business logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Calls the reducer with (state, action, environment)
    /// 3. Executes returned effects **sequentially**, feeding produced
    ///    actions back into the reducer until the queue drains
    ///
    /// The sequential drain means `send` returns only once every effect
    /// chain triggered by this action has completed (except `Delay`
    /// effects, which resolve on a background task).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Closed`] if the store has been closed.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<(), StoreError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Arc::clone(&self.inner).drain(action).await;
        Ok(())
    }

    /// Read state through a closure
    pub async fn state<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Close the store
    ///
    /// Subsequent `send` calls fail with [`StoreError::Closed`], and any
    /// action produced by a still-running effect is dropped instead of
    /// reaching the reducer.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        tracing::debug!("store closed");
    }

    /// Reopen a closed store
    ///
    /// State is whatever the reducer left it as; resetting state on
    /// close/reopen is the reducer's responsibility.
    pub fn reopen(&self) {
        self.inner.closed.store(false, Ordering::Release);
    }

    /// Whether the store is currently closed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl<S, A, E, R> Inner<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Run one action and every follow-up action its effects produce
    ///
    /// Boxed rather than an `async fn`: delayed actions re-enter `drain`
    /// from their own task, which makes the future type recursive.
    fn drain(self: Arc<Self>, action: A) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin(async move {
            let mut queue = VecDeque::new();
            queue.push_back(action);

            while let Some(action) = queue.pop_front() {
                if self.closed.load(Ordering::Acquire) {
                    tracing::debug!("dropping action produced after close");
                    return;
                }

                let effects = {
                    let mut state = self.state.write().await;
                    self.reducer.reduce(&mut state, action, &self.environment)
                };

                for effect in effects {
                    match effect {
                        Effect::None => {},
                        Effect::Future(future) => {
                            if let Some(next) = future.await {
                                queue.push_back(next);
                            }
                        },
                        Effect::Delay { duration, action } => {
                            let inner = Arc::clone(&self);
                            tokio::spawn(async move {
                                tokio::time::sleep(duration).await;
                                if inner.closed.load(Ordering::Acquire) {
                                    tracing::debug!("dropping delayed action after close");
                                    return;
                                }
                                inner.drain(*action).await;
                            });
                        },
                    }
                }
            }
        })
    }
}
