#![forbid(unsafe_code)]

//! Future-shaped view of an operation's callback.
//!
//! The `*_async` operations return a [`Completion`] instead of taking a
//! callback. It resolves when the operation's callback stack drains, so it
//! only makes progress while the manager is pumped. Outside an executor,
//! [`Completion::result`] polls it synchronously.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::session::Callback;

#[derive(Debug, Default)]
struct Shared {
    result: Option<bool>,
    waker: Option<Waker>,
}

/// Resolves to the operation's success flag.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    shared: Rc<RefCell<Shared>>,
}

impl Completion {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Callback that resolves this completion.
    pub(crate) fn callback(&self) -> Callback {
        let shared = Rc::clone(&self.shared);
        Box::new(move |success| {
            let waker = {
                let mut state = shared.borrow_mut();
                state.result = Some(success);
                state.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        })
    }

    /// The success flag, once the operation resolved.
    pub fn result(&self) -> Option<bool> {
        self.shared.borrow().result
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.result().is_some()
    }
}

impl Future for Completion {
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        let mut state = self.shared.borrow_mut();
        match state.result {
            Some(success) => Poll::Ready(success),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
