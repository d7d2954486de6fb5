use std::cell::RefCell;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

/// Something in the item or log collections changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Items,
    Logs,
}

/// Fans events out to every live [`Subscription`].
///
/// Subscribers that were dropped are pruned on the next `notify`.
pub struct Notifier<E> {
    subscribers: RefCell<Vec<Sender<E>>>,
}

impl<E: Clone> Notifier<E> {
    pub fn new() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = channel();
        self.subscribers.borrow_mut().push(tx);
        Subscription { rx }
    }

    pub fn notify(&self, event: E) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<E: Clone> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end handed to a caller. Drop it to unsubscribe.
pub struct Subscription<E> {
    rx: Receiver<E>,
}

impl<E> Subscription<E> {
    /// Everything received since the last call, oldest first.
    pub fn drain(&self) -> Vec<E> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    pub fn changed(&self) -> bool {
        !self.drain().is_empty()
    }
}
