mod action_error;
mod clock;
mod execution_state;
mod state_store;
mod stateful_action;
mod stream_ext;
pub mod macros;

pub use action_error::*;
pub use clock::*;
pub use execution_state::*;
pub use state_store::*;
pub use stateful_action::*;
pub use stream_ext::*;

#[cfg(test)]
mod unit_tests;
