use crate::bus::{BusClient, BusError, Message};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Default)]
struct HubInner {
    next_id: u32,
    queues: HashMap<u32, VecDeque<Message>>,
}

/// In-process message broker.
///
/// Every published message is fanned out to the pending queue of every
/// registered participant, the sender included — a participant that publishes
/// the terminal kind receives its own copy and shuts down like everyone else.
/// Fetching drains a participant's queue in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MessageHub {
    inner: Arc<Mutex<HubInner>>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unregistered client bound to this hub.
    pub fn client(&self) -> LocalBusClient {
        LocalBusClient {
            hub: self.clone(),
            id: None,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.queues.len())
            .unwrap_or(0)
    }

    fn register(&self) -> Result<u32, BusError> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.queues.insert(id, VecDeque::new());
        debug!(participant = id, "participant registered with hub");
        Ok(id)
    }

    fn unregister(&self, id: u32) -> Result<(), BusError> {
        let mut inner = self.lock()?;
        if inner.queues.remove(&id).is_none() {
            return Err(BusError::NotRegistered);
        }
        debug!(participant = id, "participant unregistered from hub");
        Ok(())
    }

    fn publish(&self, id: u32, message: &Message) -> Result<(), BusError> {
        let mut inner = self.lock()?;
        if !inner.queues.contains_key(&id) {
            return Err(BusError::NotRegistered);
        }
        for queue in inner.queues.values_mut() {
            queue.push_back(message.clone());
        }
        Ok(())
    }

    fn fetch(&self, id: u32) -> Result<Vec<Message>, BusError> {
        let mut inner = self.lock()?;
        let queue = inner.queues.get_mut(&id).ok_or(BusError::NotRegistered)?;
        Ok(queue.drain(..).collect())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HubInner>, BusError> {
        self.inner
            .lock()
            .map_err(|_| BusError::Transport("hub lock poisoned".into()))
    }
}

/// A participant's handle onto an in-process [`MessageHub`].
#[derive(Debug)]
pub struct LocalBusClient {
    hub: MessageHub,
    id: Option<u32>,
}

impl BusClient for LocalBusClient {
    fn register(&mut self) -> Result<(), BusError> {
        let id = self.hub.register()?;
        self.id = Some(id);
        Ok(())
    }

    fn fetch_pending(&mut self) -> Result<Vec<Message>, BusError> {
        let id = self.id.ok_or(BusError::NotRegistered)?;
        self.hub.fetch(id)
    }

    fn publish(&mut self, message: &Message) -> Result<(), BusError> {
        let id = self.id.ok_or(BusError::NotRegistered)?;
        self.hub.publish(id, message)
    }

    fn unregister(&mut self) -> Result<(), BusError> {
        let id = self.id.take().ok_or(BusError::NotRegistered)?;
        self.hub.unregister(id)
    }
}
