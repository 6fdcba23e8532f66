//! Ordered publish/subscribe bus owned by a room.
//!
//! # Guarantees
//!
//! - **Publish order**: history order always equals the order in which
//!   `publish` calls reached the bus, however long fan-out takes
//! - **Snapshot delivery**: a message is delivered to exactly the subscribers
//!   registered when it was published; earlier history is never replayed
//! - **Bounded stack**: publishes issued from inside a subscriber are queued and
//!   picked up by the loop that is already draining, never dispatched re-entrantly
//! - **Terminal lifecycle**: once terminated, publish and subscribe fail with
//!   [`BusClosedError`]; history and subscribers stay inspectable, and messages
//!   accepted before termination are still delivered
//!
//! The bus does not bound reply chains. A conversation in which every
//! subscriber always answers runs until something terminates the bus.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::BusClosedError;
use crate::message::Message;

/// Lifecycle of a bus. `Terminated` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusState {
    /// Accepting publishes and subscriptions.
    Active,
    /// Closed for new traffic.
    Terminated,
}

/// A handler registered on a [`MessageBus`].
///
/// The bus passes itself as dispatch context so a subscriber can publish
/// follow-up messages without holding a reference of its own.
#[async_trait]
pub trait Subscriber: Send + Sync {
    /// Handles one delivered message.
    async fn on_message(&self, message: &Message, bus: &MessageBus);
}

struct Dispatch {
    message: Message,
    subscribers: Vec<Arc<dyn Subscriber>>,
}

struct BusInner {
    state: BusState,
    history: Vec<Message>,
    subscribers: Vec<Arc<dyn Subscriber>>,
    queue: VecDeque<Dispatch>,
}

/// Publish/subscribe primitive with an append-only history.
pub struct MessageBus {
    inner: Mutex<BusInner>,
    draining: AtomicBool,
}

/// Clears the drain flag when the draining task finishes, is cancelled or unwinds.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MessageBus {
    /// Creates an active bus with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BusInner {
                state: BusState::Active,
                history: Vec::new(),
                subscribers: Vec::new(),
                queue: VecDeque::new(),
            }),
            draining: AtomicBool::new(false),
        }
    }

    /// Appends `message` to the history and delivers it to every current subscriber.
    ///
    /// If no other task is dispatching, this call runs the dispatch loop and
    /// returns once every cascade it triggered has settled. Otherwise it
    /// returns as soon as the message is queued.
    pub async fn publish(&self, message: Message) -> Result<(), BusClosedError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.state == BusState::Terminated {
                return Err(BusClosedError);
            }

            debug!(
                message_id = %message.id,
                sender = %message.sender,
                subscribers = inner.subscribers.len(),
                "Publishing message"
            );

            let subscribers = inner.subscribers.clone();
            inner.history.push(message.clone());
            inner.queue.push_back(Dispatch {
                message,
                subscribers,
            });
        }

        self.drain().await;
        Ok(())
    }

    /// Registers a subscriber for every message published from now on.
    pub async fn subscribe(&self, subscriber: Arc<dyn Subscriber>) -> Result<(), BusClosedError> {
        let mut inner = self.inner.lock().await;
        if inner.state == BusState::Terminated {
            return Err(BusClosedError);
        }
        inner.subscribers.push(subscriber);
        debug!(subscribers = inner.subscribers.len(), "Subscriber registered");
        Ok(())
    }

    /// Snapshot of every published message, in publish order.
    pub async fn history(&self) -> Vec<Message> {
        self.inner.lock().await.history.clone()
    }

    /// Closes the bus to new publishes and subscriptions. Calling it again is a no-op.
    ///
    /// Messages already accepted keep their deliveries: the running dispatch
    /// loop still hands them to the subscribers captured at publish time.
    pub async fn terminate(&self) {
        let mut inner = self.inner.lock().await;
        if inner.state == BusState::Terminated {
            return;
        }
        inner.state = BusState::Terminated;
        info!(
            history = inner.history.len(),
            pending_deliveries = inner.queue.len(),
            "Message bus terminated"
        );
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> BusState {
        self.inner.lock().await.state
    }

    /// True once [`terminate`](Self::terminate) has run.
    pub async fn is_terminated(&self) -> bool {
        self.state().await == BusState::Terminated
    }

    /// Number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.inner.lock().await.subscribers.len()
    }

    /// Messages published but not yet handed to their subscribers.
    pub async fn pending(&self) -> usize {
        self.inner.lock().await.queue.len()
    }

    async fn drain(&self) {
        loop {
            if self
                .draining
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return;
            }

            {
                let _guard = DrainGuard(&self.draining);
                while let Some(dispatch) = self.next_dispatch().await {
                    let Dispatch {
                        message,
                        subscribers,
                    } = dispatch;
                    join_all(
                        subscribers
                            .iter()
                            .map(|subscriber| subscriber.on_message(&message, self)),
                    )
                    .await;
                }
            }

            // A publish may have queued work after the last pop but before the flag dropped.
            if self.inner.lock().await.queue.is_empty() {
                return;
            }
        }
    }

    async fn next_dispatch(&self) -> Option<Dispatch> {
        self.inner.lock().await.queue.pop_front()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MessageBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("draining", &self.draining.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
