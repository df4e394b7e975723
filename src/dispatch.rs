use crate::bus::{kind, BusClient, BusError, Message, Outbox};
use std::time::Duration;
use tracing::{info, warn};

/// A participant role driven by the dispatch loop.
///
/// `on_message` is called once per pending message in strict batch order;
/// `on_poll` runs after the batch for time-driven checks and periodic output.
/// Neither may suspend: the only suspension point in a participant is the
/// fixed sleep between cycles.
pub trait Role {
    fn name(&self) -> &'static str;

    /// Fixed sleep between cycles. Observed facility values: 1000 ms for the
    /// monitor, 2500 ms for sensors and controllers, 5000 ms for the
    /// maintenance console.
    fn poll_period(&self) -> Duration;

    /// The `"name#description"` liveness record published at the top of each
    /// cycle, for roles that announce themselves.
    fn heartbeat(&self) -> Option<String> {
        None
    }

    fn on_message(&mut self, message: &Message, outbox: &mut Outbox);

    fn on_poll(&mut self, _outbox: &mut Outbox) {}
}

/// Applies one fetched batch to a role, then runs its periodic check.
///
/// Returns the emitted messages and whether a terminal message was seen.
/// The terminal kind sets the done flag but the rest of the batch is still
/// applied — draining is always complete.
pub fn dispatch_batch<R: Role>(role: &mut R, batch: &[Message]) -> (Outbox, bool) {
    let mut outbox = Outbox::new();
    let mut done = false;

    for message in batch {
        if message.is_terminal() {
            done = true;
        }
        role.on_message(message, &mut outbox);
    }
    role.on_poll(&mut outbox);

    (outbox, done)
}

/// Drives a single participant: register, then cycle
/// fetch -> dispatch -> periodic check -> publish -> sleep until the terminal
/// kind is seen, then unregister and return.
///
/// Bus failures inside the loop are logged and the cycle proceeds with
/// whatever state existed before the failure. Only registration failure at
/// startup is fatal.
pub struct DispatchLoop<C: BusClient, R: Role> {
    client: C,
    role: R,
}

impl<C: BusClient, R: Role> DispatchLoop<C, R> {
    pub fn new(client: C, role: R) -> Self {
        Self { client, role }
    }

    pub async fn run(mut self) -> Result<(), BusError> {
        self.client.register()?;
        info!(role = self.role.name(), "registered with the message hub");

        let period = self.role.poll_period();
        loop {
            if let Some(record) = self.role.heartbeat() {
                if let Err(e) = self.client.publish(&Message::new(kind::HEARTBEAT, record)) {
                    warn!(role = self.role.name(), error = %e, "failed to publish heartbeat");
                }
            }

            let batch = match self.client.fetch_pending() {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(role = self.role.name(), error = %e, "error fetching message queue");
                    Vec::new()
                }
            };

            let (outbox, done) = dispatch_batch(&mut self.role, &batch);

            for message in &outbox {
                if let Err(e) = self.client.publish(message) {
                    warn!(
                        role = self.role.name(),
                        kind = message.kind,
                        error = %e,
                        "failed to publish message"
                    );
                }
            }

            if done {
                if let Err(e) = self.client.unregister() {
                    warn!(role = self.role.name(), error = %e, "error unregistering");
                }
                info!(role = self.role.name(), "simulation stopped");
                return Ok(());
            }

            tokio::time::sleep(period).await;
        }
    }
}
