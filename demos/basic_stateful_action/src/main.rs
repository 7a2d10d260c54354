use crate::tracing_setup::tracing_init;
use actstate::{wrap_action, ExecutionStreamExt, NamedError};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod tracing_setup;

#[tokio::main]
async fn main() {
    tracing_init();

    info!("==========================================");
    warn!("A. Successful execution, observed through a signal");

    let action = wrap_action!(fetch_report);
    let observer = tokio::spawn(
        action
            .state()
            .is_executing_signal()
            .for_each(|executing| async move {
                info!("  Observer | is_executing: {executing}");
            }),
    );

    let call = action.call(3);
    info!("  Main | state right after call: {:?}", action.get_state());
    match call.await {
        Ok(report) => info!("  Main | report: {report}"),
        Err(error) => warn!("  Main | failed: {error}"),
    }
    info!("  Main | settled state: {:?}", action.get_state());

    info!("==========================================");
    warn!("B. Failure is recorded in the state");

    if let Err(error) = action.call(0).await {
        info!("  Main | error {} / {}", error.name(), error.message());
    }
    info!("  Main | settled state: {:?}", action.get_state());

    info!("==========================================");
    warn!("C. Cancellation from a token");

    let token = CancellationToken::new();
    action.cancel_when(token.clone());
    let call = action.call(5);
    let states = action.state().to_stream().until_settled();
    tokio::spawn(async move {
        sleep(Duration::from_millis(50)).await;
        token.cancel();
    });
    let watch = states.for_each(|state| async move {
        info!("  Main | show state: {:?}", state);
    });
    let ((), outcome) = tokio::join!(watch, call);
    if let Err(error) = outcome {
        info!("  Main | cancelled: {} ({})", error.message(), error.name());
    }

    info!("==========================================");
    warn!("D. Mocked result, no execution");

    action.set_mock(Ok("mocked report".to_string()));
    if let Ok(report) = action.call(42).await {
        info!("  Main | report: {report}, state: {:?}", action.get_state());
    }
    action.clear_mock();

    info!("==========================================");
    warn!("E. Second call while the first is running");

    let first = tokio::spawn(action.call(1));
    let second = tokio::spawn(action.call(2));
    let _ = first.await;
    info!("  Main | after first: {:?}", action.get_state());
    let _ = second.await;
    info!("  Main | after second: {:?}", action.get_state());

    observer.abort();
    info!("  Main | Finish");
}

async fn fetch_report(id: u32) -> Result<String, NamedError> {
    sleep(Duration::from_millis(100 + u64::from(id) * 10)).await;
    if id == 0 {
        return Err(NamedError::new("NOT_FOUND", "report 0 does not exist"));
    }
    Ok(format!("report #{id}"))
}
