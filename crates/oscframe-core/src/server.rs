//! The single-threaded OSC server dispatcher.
//!
//! The server owns an ordered handler registry and two pending-message
//! queues: `parsed` collects messages decoded from the packet currently
//! being ingested, `stored` carries messages whose timetag has not yet
//! elapsed across cycles. One [`Server::cycle`] drains due stored
//! messages, ingests every pending packet, dispatches what is already
//! due, and carries the rest over.
//!
//! Handlers run synchronously on the caller's stack and receive the
//! message by shared reference, valid only for the duration of the call.
//! The borrow rules make it impossible for a handler to reach back into
//! the registry mid-dispatch.

use std::{num::NonZeroUsize, rc::Rc};

use tracing::{debug, trace, warn};

use oscframe_proto::{Bundle, Element, Message, Packet, Timetag, matches};

use crate::{
    clock::Clock,
    error::{Result, ServerError},
    transport::Transport,
};

/// Callback invoked with each dispatched message.
///
/// `Rc` rather than `Arc`: the whole dispatcher is single-threaded by
/// contract, and pointer identity is what [`Server::remove_handler`]
/// keys on, mirroring the function-pointer identity of the original
/// embedded API.
pub type Handler = Rc<dyn Fn(&Message)>;

/// One registry entry: a pattern and the method it routes to.
struct HandlerEntry {
    pattern: String,
    method: Handler,
}

/// One queued message with its effective timetag.
struct Pending {
    message: Message,
    timetag: Timetag,
}

/// Dispatcher tuning.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Upper bound on packets ingested per cycle. `None` drains the
    /// transport until it reports idle, which never returns if the host
    /// keeps packets pending indefinitely.
    pub max_packets_per_cycle: Option<NonZeroUsize>,
}

/// A single-threaded OSC message dispatcher.
///
/// Construction takes only the host clock; all other behavior comes from
/// the handler registry and the transport passed to each cycle.
pub struct Server<C> {
    clock: C,
    config: ServerConfig,
    handlers: Vec<HandlerEntry>,
    parsed: Vec<Pending>,
    stored: Vec<Pending>,
}

impl<C: Clock> Server<C> {
    /// Create a server with default configuration.
    pub fn new(clock: C) -> Self {
        Self::with_config(clock, ServerConfig::default())
    }

    /// Create a server with explicit configuration.
    pub fn with_config(clock: C, config: ServerConfig) -> Self {
        Self { clock, config, handlers: Vec::new(), parsed: Vec::new(), stored: Vec::new() }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Number of messages waiting for their timetag to elapse.
    #[must_use]
    pub fn pending_messages(&self) -> usize {
        self.stored.len() + self.parsed.len()
    }

    /// Register `method` under `pattern`, behind all existing handlers.
    ///
    /// The pattern is copied. Handlers with identical patterns fire in
    /// registration order.
    ///
    /// # Errors
    ///
    /// [`ServerError::Allocation`]; the registry is unchanged on failure.
    pub fn add_handler(&mut self, pattern: &str, method: Handler) -> Result<()> {
        let mut copy = String::new();
        copy.try_reserve_exact(pattern.len())?;
        copy.push_str(pattern);
        self.handlers.try_reserve(1)?;
        self.handlers.push(HandlerEntry { pattern: copy, method });
        Ok(())
    }

    /// Remove the first handler whose pattern equals `pattern` byte-wise
    /// and whose method is the same callback (`Rc` identity).
    ///
    /// Remaining entries keep their order.
    ///
    /// # Errors
    ///
    /// [`ServerError::HandlerNotFound`] when no entry matches.
    pub fn remove_handler(&mut self, pattern: &str, method: &Handler) -> Result<()> {
        let index = self
            .handlers
            .iter()
            .position(|entry| entry.pattern == pattern && Rc::ptr_eq(&entry.method, method))
            .ok_or_else(|| ServerError::HandlerNotFound { pattern: pattern.to_owned() })?;
        self.handlers.remove(index);
        Ok(())
    }

    /// Run one dispatch cycle against `transport`.
    ///
    /// Drains due stored messages, then ingests pending packets one at a
    /// time: each packet's messages are queued with their effective
    /// timetags, due ones dispatched, the rest appended to the stored
    /// queue. A malformed packet is discarded whole; messages queued from
    /// earlier packets are untouched. Allocation failure stops ingestion
    /// for this cycle.
    pub fn cycle<T: Transport>(&mut self, transport: &mut T) {
        self.drain_stored();

        let mut ingested = 0usize;
        loop {
            if self.config.max_packets_per_cycle.is_some_and(|cap| ingested >= cap.get()) {
                break;
            }
            let size = transport.packet_size() as usize;
            if size == 0 {
                break;
            }
            ingested += 1;

            let mut buf = Vec::new();
            if buf.try_reserve_exact(size).is_err() {
                warn!(size, "packet buffer reservation failed, stopping ingest");
                break;
            }
            buf.resize(size, 0);
            transport.read_packet(&mut buf);

            match self.ingest(&buf) {
                Ok(()) => {
                    self.drain_parsed();
                    self.store_parsed();
                }
                Err(err) => {
                    warn!(error = %err, size, "discarding malformed packet");
                    self.parsed.clear();
                }
            }
        }
    }

    /// Run [`Server::cycle`] forever with no back-off.
    ///
    /// The host is expected to yield inside the transport's
    /// [`Transport::packet_size`] when idle.
    pub fn run<T: Transport>(&mut self, transport: &mut T) -> ! {
        loop {
            self.cycle(transport);
        }
    }

    /// Decode one packet and queue every message it contains onto
    /// `parsed`, each with the timetag of its enclosing bundle
    /// ("immediately" for a top-level message).
    fn ingest(&mut self, packet: &[u8]) -> Result<()> {
        match Packet::decode(packet)? {
            Packet::Message(message) => self.enqueue(message, Timetag::IMMEDIATELY),
            Packet::Bundle(bundle) => self.enqueue_bundle(bundle),
        }
    }

    fn enqueue_bundle(&mut self, bundle: Bundle) -> Result<()> {
        let timetag = bundle.timetag();
        for element in bundle.into_elements() {
            match element {
                Element::Message(message) => self.enqueue(message, timetag)?,
                Element::Bundle(nested) => self.enqueue_bundle(nested)?,
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, message: Message, timetag: Timetag) -> Result<()> {
        self.parsed.try_reserve(1)?;
        self.parsed.push(Pending { message, timetag });
        Ok(())
    }

    fn drain_stored(&mut self) {
        drain_queue(&self.handlers, self.clock.time(), &mut self.stored);
    }

    fn drain_parsed(&mut self) {
        drain_queue(&self.handlers, self.clock.time(), &mut self.parsed);
    }

    /// Move everything left in `parsed` to the tail of `stored`.
    fn store_parsed(&mut self) {
        if self.parsed.is_empty() {
            return;
        }
        if self.stored.try_reserve(self.parsed.len()).is_err() {
            // Allocation failure aborts the current packet only.
            warn!(dropped = self.parsed.len(), "stored queue reservation failed");
            self.parsed.clear();
            return;
        }
        debug!(deferred = self.parsed.len(), "carrying undispatched messages over");
        self.stored.append(&mut self.parsed);
    }
}

/// One pass over a queue: fire every due entry past every matching
/// handler, keep entries that are not due or matched no handler.
///
/// With an empty registry nothing is drained; due messages wait for a
/// handler to be registered. A clock reading of "immediately" means the
/// host has no time reference and releases everything queued.
fn drain_queue(handlers: &[HandlerEntry], now: Timetag, queue: &mut Vec<Pending>) {
    if queue.is_empty() || handlers.is_empty() {
        return;
    }

    queue.retain(|entry| {
        if !entry.timetag.is_due(now) {
            return true;
        }
        let mut fired = 0usize;
        for handler in handlers {
            if matches(&handler.pattern, entry.message.address()) {
                (handler.method)(&entry.message);
                fired += 1;
            }
        }
        if fired > 0 {
            trace!(address = entry.message.address(), fired, "dispatched message");
        }
        fired == 0
    });
}
