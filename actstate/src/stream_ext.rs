use crate::ExecutionState;
use futures_core::stream::{FusedStream, Stream};
use pin_project::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Stream combinators for watching an action's state.
pub trait ExecutionStreamExt: Stream {
    /// Follows an [`ExecutionState`] stream until the action settles.
    ///
    /// The first idle state is yielded and ends the stream, so subscribing to
    /// an idle action yields exactly one item. Subscribe after `call` to watch
    /// that call through to its settlement.
    fn until_settled(self) -> UntilSettled<Self>
    where
        Self: Stream<Item = ExecutionState> + Sized,
    {
        UntilSettled {
            inner: self.stop_if(ExecutionState::is_idle as fn(&ExecutionState) -> bool),
        }
    }

    /// Yields items up to and including the first one for which `last` holds.
    fn stop_if<F>(self, last: F) -> StopIf<Self, F>
    where
        F: FnMut(&Self::Item) -> bool,
        Self: Sized,
    {
        StopIf {
            stream: self,
            last,
            finished: false,
        }
    }
}

impl<S: Stream + ?Sized> ExecutionStreamExt for S {}

/// Stream returned by [`ExecutionStreamExt::until_settled`].
#[pin_project]
#[must_use = "streams do nothing unless polled"]
pub struct UntilSettled<S> {
    #[pin]
    inner: StopIf<S, fn(&ExecutionState) -> bool>,
}

impl<S> Stream for UntilSettled<S>
where
    S: Stream<Item = ExecutionState>,
{
    type Item = ExecutionState;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ExecutionState>> {
        self.project().inner.poll_next(cx)
    }
}

impl<S> FusedStream for UntilSettled<S>
where
    S: Stream<Item = ExecutionState>,
{
    fn is_terminated(&self) -> bool {
        self.inner.finished
    }
}

/// Stream returned by [`ExecutionStreamExt::stop_if`].
#[pin_project]
#[derive(Debug)]
#[must_use = "streams do nothing unless polled"]
pub struct StopIf<S, F> {
    #[pin]
    stream: S,
    last: F,
    finished: bool,
}

impl<S, F> Stream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        let this = self.project();
        if *this.finished {
            return Poll::Ready(None);
        }
        let item = std::task::ready!(this.stream.poll_next(cx));
        *this.finished = item.as_ref().map_or(true, |item| (this.last)(item));
        Poll::Ready(item)
    }
}

impl<S, F> FusedStream for StopIf<S, F>
where
    S: Stream,
    F: FnMut(&S::Item) -> bool,
{
    fn is_terminated(&self) -> bool {
        self.finished
    }
}
