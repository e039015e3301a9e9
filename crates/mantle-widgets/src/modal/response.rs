#![forbid(unsafe_code)]

//! Single-resolution dialog results.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// The eventual answer of a transient dialog.
///
/// Resolves exactly once. If the dialog is torn down without answering
/// (for example its registry was dropped), the response settles with the
/// fallback value instead: `()` for alerts, `false` for confirms.
///
/// Await it from an executor, or poll it from an event loop with
/// [`try_take`](Self::try_take).
#[derive(Debug)]
#[must_use = "the dialog answer is lost if the response is dropped"]
pub struct DialogResponse<T> {
    receiver: oneshot::Receiver<T>,
    fallback: Option<T>,
}

impl<T> DialogResponse<T> {
    /// The answer, if the dialog has settled. Returns `None` while it is
    /// still open, and after the answer has been taken.
    pub fn try_take(&mut self) -> Option<T> {
        match self.receiver.try_recv() {
            Ok(Some(value)) => {
                self.fallback = None;
                Some(value)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => self.fallback.take(),
        }
    }
}

impl<T: Unpin> Future for DialogResponse<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(value)) => {
                this.fallback = None;
                Poll::Ready(value)
            }
            Poll::Ready(Err(oneshot::Canceled)) => match this.fallback.take() {
                Some(value) => Poll::Ready(value),
                // Fallback already handed out through `try_take`.
                None => Poll::Pending,
            },
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Sending half. Clones share one slot; only the first `resolve` lands.
pub(crate) struct Responder<T> {
    sender: Rc<RefCell<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for Responder<T> {
    fn clone(&self) -> Self {
        Self {
            sender: Rc::clone(&self.sender),
        }
    }
}

impl<T> Responder<T> {
    /// Settle the response. Returns `false` if it was already settled.
    pub(crate) fn resolve(&self, value: T) -> bool {
        let Some(sender) = self.sender.borrow_mut().take() else {
            return false;
        };
        // The receiver may be gone; the dialog still counts as answered.
        let _ = sender.send(value);
        true
    }
}

pub(crate) fn channel<T>(fallback: T) -> (Responder<T>, DialogResponse<T>) {
    let (sender, receiver) = oneshot::channel();
    (
        Responder {
            sender: Rc::new(RefCell::new(Some(sender))),
        },
        DialogResponse {
            receiver,
            fallback: Some(fallback),
        },
    )
}
