//! Handler invocation recorder.

use std::{cell::RefCell, rc::Rc};

use oscframe_core::Handler;
use oscframe_proto::Message;

/// A shared log of handler invocations.
///
/// Each [`Recorder::handler`] call produces an independent [`Handler`]
/// (its own `Rc` identity) that appends `label:address` to the shared
/// log, so a test can assert both which handlers fired and in what
/// order.
#[derive(Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    /// Create a handler that logs under `label`.
    #[must_use]
    pub fn handler(&self, label: &str) -> Handler {
        let log = Rc::clone(&self.log);
        let label = label.to_owned();
        Rc::new(move |message: &Message| {
            log.borrow_mut().push(format!("{label}:{}", message.address()));
        })
    }

    /// Drain and return everything logged so far.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        self.log.borrow_mut().drain(..).collect()
    }

    /// Copy of the log without draining it.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}
