use crate::{
    ActionError, ActionFailure, Clock, ExecutionState, ExecutionStore, TokioClock, ACTION_ABORTED,
};
use futures_core::future::BoxFuture;
use futures_signals::signal::Mutable;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

type Invoke<A, T, E> = dyn Fn(A) -> Result<BoxFuture<'static, Result<T, E>>, E> + Send + Sync;
type MockResult<T, E> = Arc<dyn Fn() -> Result<T, E> + Send + Sync>;

/// An async callable bundled with an observable [`ExecutionState`].
///
/// Each call moves the state from idle to executing and back, recording the
/// duration and any error. Concurrent calls are not serialized: they share the
/// one state, and the later start overwrites the earlier `time_start`.
///
/// Cloning a `StatefulAction` shares the callable, the state and the mock.
pub struct StatefulAction<A, T, E> {
    inner: Arc<Inner<A, T, E>>,
}

struct Inner<A, T, E> {
    name: String,
    invoke: Box<Invoke<A, T, E>>,
    store: ExecutionStore,
    mock: Mutable<Option<MockResult<T, E>>>,
    clock: Arc<dyn Clock>,
    /// Cancelled when the last handle to the action goes away.
    released: CancellationToken,
}

impl<A, T, E> Drop for Inner<A, T, E> {
    fn drop(&mut self) {
        self.released.cancel();
    }
}

enum Started<T, E> {
    Mocked(Result<T, E>),
    Settled(ActionError<E>),
    Running(JoinHandle<Result<T, ActionError<E>>>),
}

impl<A, T, E> Clone for StatefulAction<A, T, E> {
    fn clone(&self) -> Self {
        StatefulAction {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, T, E> StatefulAction<A, T, E>
where
    A: 'static,
    T: Send + 'static,
    E: ActionFailure + Send + 'static,
{
    /// Wraps an async callable.
    pub fn wrap<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_invoke(
            name.into(),
            Box::new(move |args: A| -> Result<BoxFuture<'static, Result<T, E>>, E> {
                Ok(Box::pin(f(args)))
            }),
        )
    }

    /// Wraps a callable that may fail before it produces a future.
    ///
    /// A synchronous failure settles the state before `call` returns.
    pub fn wrap_fallible<F, Fut>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(A) -> Result<Fut, E> + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self::from_invoke(
            name.into(),
            Box::new(move |args: A| -> Result<BoxFuture<'static, Result<T, E>>, E> {
                f(args).map(|future| Box::pin(future) as BoxFuture<'static, Result<T, E>>)
            }),
        )
    }

    fn from_invoke(name: String, invoke: Box<Invoke<A, T, E>>) -> Self {
        if name.is_empty() {
            warn!("name is empty, please provide a valid name for the stateful action");
        }
        StatefulAction {
            inner: Arc::new(Inner {
                name,
                invoke,
                store: ExecutionStore::default(),
                mock: Mutable::new(None),
                clock: Arc::new(TokioClock::new()),
                released: CancellationToken::new(),
            }),
        }
    }

    /// Replaces the clock used for `time_start` and `execution_time`.
    ///
    /// Must be called before the action is cloned or invoked.
    pub fn with_clock(self, clock: impl Clock) -> Self {
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                inner.clock = Arc::new(clock);
                StatefulAction {
                    inner: Arc::new(inner),
                }
            }
            Err(inner) => {
                warn!(action = %inner.name, "clock not replaced, the action is already shared");
                StatefulAction { inner }
            }
        }
    }

    /// Invokes the callable.
    ///
    /// The state turns `executing` before this returns, and the callable's
    /// future is spawned onto the tokio runtime right away. Settlement happens
    /// in that task, so the state settles even when the returned future is
    /// dropped or never polled. Awaiting the returned future yields the outcome.
    ///
    /// Mocked calls and synchronous failures never spawn; every other call must
    /// be made within a tokio runtime.
    pub fn call(&self, args: A) -> impl Future<Output = Result<T, ActionError<E>>> + Send + 'static {
        let started = self.start(args);
        let inner = Arc::clone(&self.inner);
        async move {
            match started {
                Started::Mocked(result) => result.map_err(ActionError::Failed),
                Started::Settled(error) => Err(error),
                Started::Running(execution) => match execution.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(inner.after_execution_aborted(join_error)),
                },
            }
        }
    }

    fn start(&self, args: A) -> Started<T, E> {
        let mock = self.inner.mock.get_cloned();
        if let Some(mock) = mock {
            return Started::Mocked(mock());
        }

        self.inner.before_execution();
        match (self.inner.invoke)(args) {
            Ok(future) => {
                let inner = Arc::clone(&self.inner);
                Started::Running(tokio::spawn(async move {
                    match future.await {
                        Ok(value) => inner.after_execution().map(|()| value),
                        Err(error) => Err(inner.after_execution_error(ActionError::Failed(error))),
                    }
                }))
            }
            Err(error) => Started::Settled(self.inner.after_execution_error(ActionError::Failed(error))),
        }
    }
}

impl<A, T, E> StatefulAction<A, T, E> {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn state(&self) -> &ExecutionStore {
        &self.inner.store
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> ExecutionState {
        self.inner.store.get_state()
    }

    /// Marks the running execution as cancelled.
    ///
    /// The work itself keeps running; its settlement is reported as
    /// `ACTION_CANCELED`.
    pub fn cancel(&self) {
        self.inner.store.set_cancelled(true);
    }

    /// Raises the cancellation flag once `token` is cancelled.
    ///
    /// The watching task ends when the token fires or when the last clone of
    /// this action is dropped. Must be called within a tokio runtime.
    pub fn cancel_when(&self, token: CancellationToken) {
        let store = self.inner.store.clone();
        let released = self.inner.released.clone();
        let name = self.inner.name.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(action = %name, "cancellation token fired");
                    store.set_cancelled(true);
                }
                _ = released.cancelled() => {}
            }
        });
    }

    /// Makes every call return `result` without executing or touching the state.
    pub fn set_mock(&self, result: Result<T, E>)
    where
        T: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        let mock: MockResult<T, E> = Arc::new(move || result.clone());
        self.inner.mock.set(Some(mock));
    }

    /// Like [`set_mock`](Self::set_mock), producing the result on each call.
    pub fn set_mock_with<F>(&self, result: F)
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let mock: MockResult<T, E> = Arc::new(result);
        self.inner.mock.set(Some(mock));
    }

    pub fn clear_mock(&self) {
        self.inner.mock.set(None);
    }

    pub fn is_mocked(&self) -> bool {
        self.inner.mock.lock_ref().is_some()
    }
}

impl<A, T, E: ActionFailure> Inner<A, T, E> {
    fn before_execution(&self) {
        let now = self.clock.now();
        let reentered = self.store.update(|state| {
            let reentered = state.is_executing;
            state.begin(now);
            reentered
        });
        if reentered {
            warn!(
                action = %self.name,
                "function {} is already running, but was called a second time. Parallel execution is not supported",
                self.name
            );
        }
        debug!(action = %self.name, time_start = now, "execution started");
    }

    /// Success continuation. A raised cancellation flag turns the success into
    /// a cancellation error, which settles as a failure under the same lock.
    fn after_execution(&self) -> Result<(), ActionError<E>> {
        let now = self.clock.now();
        let settled = self.store.update(|state| {
            if state.is_cancelled {
                return Err(self.settle_failure(state, now, ActionError::cancelled(self.name.clone())));
            }
            state.finish(now);
            Ok(state.execution_time)
        });
        match settled {
            Ok(execution_time) => {
                debug!(action = %self.name, execution_time, "execution succeeded");
                Ok(())
            }
            Err(error) => {
                debug!(action = %self.name, error = %error.message(), kind = %error.name(), "execution failed");
                Err(error)
            }
        }
    }

    /// Failure continuation. Returns the error to hand to the caller.
    fn after_execution_error(&self, error: ActionError<E>) -> ActionError<E> {
        let now = self.clock.now();
        let error = self.store.update(|state| self.settle_failure(state, now, error));
        debug!(action = %self.name, error = %error.message(), kind = %error.name(), "execution failed");
        error
    }

    /// The spawned execution panicked or was torn down with the runtime.
    fn after_execution_aborted(&self, join_error: JoinError) -> ActionError<E> {
        let error = ActionError::aborted(self.name.clone(), join_error.to_string());
        let now = self.clock.now();
        self.store.update(|state| {
            // A panic skips both continuations; anything else already settled.
            if state.is_executing {
                state.finish(now);
                state.record_error(error.message(), ACTION_ABORTED.to_string());
            }
        });
        warn!(action = %self.name, error = %join_error, "execution aborted");
        error
    }

    fn settle_failure(&self, state: &mut ExecutionState, now: f64, error: ActionError<E>) -> ActionError<E> {
        state.finish(now);
        if state.is_cancelled {
            state.is_cancelled = false;
            let cancelled = ActionError::cancelled(self.name.clone());
            state.record_error(cancelled.message(), cancelled.name().into_owned());
            cancelled
        } else {
            state.record_error(error.message(), error.name().into_owned());
            error
        }
    }
}
