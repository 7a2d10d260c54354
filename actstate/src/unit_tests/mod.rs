use crate::{NamedError, StatefulAction};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;


pub const ACTION_TIMEOUT: u64 = 100;

pub type TestAction<A, T> = StatefulAction<A, T, NamedError>;

pub fn custom_error() -> NamedError {
    NamedError::new("CUSTOM_ERROR", "error text")
}

/// Resolves with its argument after `ACTION_TIMEOUT` milliseconds.
pub fn async_params() -> TestAction<(String, String), Vec<String>> {
    StatefulAction::wrap("asyncParams", |(first, second): (String, String)| async move {
        sleep(Duration::from_millis(ACTION_TIMEOUT)).await;
        Ok(vec![first, second])
    })
}

/// Resolves after the given number of milliseconds.
pub fn async_no_params() -> TestAction<u64, ()> {
    StatefulAction::wrap("asyncNoParams", |millis: u64| async move {
        sleep(Duration::from_millis(millis)).await;
        Ok(())
    })
}

pub fn async_error() -> TestAction<(), ()> {
    StatefulAction::wrap("asyncError", |_: ()| async {
        sleep(Duration::from_millis(ACTION_TIMEOUT)).await;
        Err(custom_error())
    })
}

/// Resolves without awaiting anything.
pub fn sync_no_params() -> TestAction<(), ()> {
    StatefulAction::wrap("syncNoParams", |_: ()| async { Ok(()) })
}

/// Fails before producing a future.
pub fn sync_error() -> TestAction<(), ()> {
    StatefulAction::wrap_fallible("syncError", |_: ()| {
        Err::<std::future::Ready<Result<(), NamedError>>, _>(custom_error())
    })
}

/// Collects formatted `tracing` output for assertions.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn capture<R>(&self, action: impl FnOnce() -> R) -> R {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, action)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
