use crate::ExecutionState;
use futures_signals::signal::{
    DedupeCloned, Mutable, MutableSignalCloned, MutableSignalRef, Signal, SignalExt, SignalStream,
};

/// Observable holder of an [`ExecutionState`].
///
/// Every call to [`ExecutionStore::update`] is one batch: observers of the
/// state wake once, however many fields the batch touched. Cloning the store
/// shares the same state.
#[derive(Debug, Clone, Default)]
pub struct ExecutionStore {
    state: Mutable<ExecutionState>,
}

impl ExecutionStore {
    pub fn new(initial_state: ExecutionState) -> Self {
        ExecutionStore {
            state: Mutable::new(initial_state),
        }
    }

    pub fn get_state(&self) -> ExecutionState {
        self.state.get_cloned()
    }

    /// Reads the state without cloning it.
    pub fn with_state<R>(&self, action: impl FnOnce(&ExecutionState) -> R) -> R {
        action(&self.state.lock_ref())
    }

    /// Applies `reducer` to the state as one batched mutation.
    pub fn update<R>(&self, reducer: impl FnOnce(&mut ExecutionState) -> R) -> R {
        let mut state = self.state.lock_mut();
        reducer(&mut state)
    }

    /// Raises or lowers the cancellation flag. Takes effect at the next settlement.
    pub fn set_cancelled(&self, cancelled: bool) {
        self.update(|state| state.is_cancelled = cancelled);
    }

    pub fn is_executing(&self) -> bool {
        self.with_state(|state| state.is_executing)
    }

    pub fn to_signal(&self) -> MutableSignalCloned<ExecutionState> {
        self.state.signal_cloned()
    }

    pub fn to_stream(&self) -> SignalStream<MutableSignalCloned<ExecutionState>> {
        self.state.signal_cloned().to_stream()
    }

    /// Observes a single field; emits only when that field changes.
    pub fn field_signal<T, F>(&self, getter: F) -> DedupeCloned<MutableSignalRef<ExecutionState, F>>
    where
        T: Clone + PartialEq,
        F: FnMut(&ExecutionState) -> T,
    {
        self.state.signal_ref(getter).dedupe_cloned()
    }

    pub fn is_executing_signal(&self) -> impl Signal<Item = bool> {
        self.field_signal(|state| state.is_executing)
    }

    pub fn time_start_signal(&self) -> impl Signal<Item = f64> {
        self.field_signal(|state| state.time_start)
    }

    pub fn execution_time_signal(&self) -> impl Signal<Item = f64> {
        self.field_signal(|state| state.execution_time)
    }

    pub fn error_signal(&self) -> impl Signal<Item = Option<String>> {
        self.field_signal(|state| state.error.clone())
    }

    pub fn is_cancelled_signal(&self) -> impl Signal<Item = bool> {
        self.field_signal(|state| state.is_cancelled)
    }
}
