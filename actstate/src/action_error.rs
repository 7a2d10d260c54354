use std::borrow::Cow;
use std::fmt::{Debug, Display};
use thiserror::Error;

/// Kind reported for executions that settle while the cancellation flag is set.
pub const ACTION_CANCELED: &str = "ACTION_CANCELED";

/// Kind reported when the spawned execution panicked or its runtime shut down.
pub const ACTION_ABORTED: &str = "ACTION_ABORTED";

/// Kind reported for failures that carry no more specific name.
pub const GENERIC_ERROR: &str = "Error";

/// A failure produced by a wrapped callable.
///
/// The `Display` output becomes `ExecutionState::error` and [`ActionFailure::name`]
/// becomes `ExecutionState::error_name`.
pub trait ActionFailure: Display {
    /// The kind identifier of this failure.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(GENERIC_ERROR)
    }

    /// The message of this failure.
    fn message(&self) -> String {
        self.to_string()
    }
}

impl ActionFailure for String {}

impl ActionFailure for &'static str {}

impl ActionFailure for std::io::Error {
    fn name(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{:?}", self.kind()))
    }
}

impl ActionFailure for Box<dyn std::error::Error + Send + Sync> {}

/// A failure with an explicit kind and message.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("{message}")]
pub struct NamedError {
    pub name: String,
    pub message: String,
}

impl NamedError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        NamedError {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ActionFailure for NamedError {
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn message(&self) -> String {
        self.message.clone()
    }
}

/// The outcome of a failed call to a [`StatefulAction`](crate::StatefulAction).
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ActionError<E> {
    /// The wrapped callable failed; its error is passed through untouched.
    #[error("{0}")]
    Failed(E),

    /// The execution settled while the cancellation flag was set.
    /// The message is the action's name.
    #[error("{action}")]
    Cancelled { action: String },

    /// The execution never reached either continuation.
    #[error("{action} aborted: {reason}")]
    Aborted { action: String, reason: String },
}

impl<E: ActionFailure> ActionError<E> {
    pub fn cancelled(action: impl Into<String>) -> Self {
        ActionError::Cancelled {
            action: action.into(),
        }
    }

    pub fn aborted(action: impl Into<String>, reason: impl Into<String>) -> Self {
        ActionError::Aborted {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Kind identifier, `ACTION_CANCELED` for cancellations.
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            ActionError::Failed(error) => error.name(),
            ActionError::Cancelled { .. } => Cow::Borrowed(ACTION_CANCELED),
            ActionError::Aborted { .. } => Cow::Borrowed(ACTION_ABORTED),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ActionError::Failed(error) => error.message(),
            ActionError::Cancelled { action } => action.clone(),
            aborted @ ActionError::Aborted { .. } => aborted.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ActionError::Cancelled { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, ActionError::Aborted { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ActionError::Failed(_))
    }

    /// Returns the callable's own error, if this is not a cancellation.
    pub fn into_inner(self) -> Option<E> {
        match self {
            ActionError::Failed(error) => Some(error),
            ActionError::Cancelled { .. } | ActionError::Aborted { .. } => None,
        }
    }
}
