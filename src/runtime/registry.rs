//! Exchange-completion registry.
//!
//! Dispatchers are registered explicitly during runtime initialization
//! rather than hanging off an anonymous global listener. The returned
//! [`Registration`] is the teardown path: hand it back to
//! [`ExchangeEvents::unregister`] and the dispatcher stops receiving
//! exchanges.

use std::sync::Arc;

use log::debug;

use crate::dom::DocumentModel;
use crate::envelope::{Dispatch, Dispatcher, ExchangeContext, Response};

/// Handle for one registered dispatcher. Not cloneable; whoever holds it
/// owns the registration.
#[derive(Debug)]
pub struct Registration {
    id: u64,
}

#[derive(Default)]
pub struct ExchangeEvents {
    next_id: u64,
    handlers: Vec<(u64, Arc<Dispatcher>)>,
}

impl ExchangeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dispatcher for exchange-completion events.
    pub fn register(&mut self, dispatcher: Arc<Dispatcher>) -> Registration {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((id, dispatcher));
        debug!("registered exchange handler {id}");
        Registration { id }
    }

    /// Tears down a registration. Returns `false` when the handle was
    /// already unregistered.
    pub fn unregister(&mut self, registration: Registration) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(id, _)| *id != registration.id);
        let removed = self.handlers.len() != before;
        if removed {
            debug!("unregistered exchange handler {}", registration.id);
        }
        removed
    }

    /// Delivers one completed exchange to every registered dispatcher, in
    /// registration order, collecting their outcomes.
    pub fn emit(
        &self,
        response: &Response,
        doc: &mut dyn DocumentModel,
        cx: &mut ExchangeContext,
    ) -> Vec<Dispatch> {
        self.handlers
            .iter()
            .map(|(_, dispatcher)| dispatcher.handle(response, doc, cx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::test_support::{json_response, RecordingSink};

    #[test]
    fn test_register_emit_unregister() {
        let sink = Arc::new(RecordingSink::new());
        let dispatcher = Arc::new(Dispatcher::new(sink.clone()));
        let mut events = ExchangeEvents::new();

        let registration = events.register(dispatcher);
        assert_eq!(events.len(), 1);

        let mut doc = MemoryDocument::new();
        let mut cx = ExchangeContext::new();
        let outcomes = events.emit(&json_response(r#"{"brx":{"toast":"x"}}"#), &mut doc, &mut cx);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(sink.take().len(), 1);

        assert!(events.unregister(registration));
        assert!(events.is_empty());

        let mut cx = ExchangeContext::new();
        let outcomes = events.emit(&json_response(r#"{"brx":{"toast":"x"}}"#), &mut doc, &mut cx);
        assert!(outcomes.is_empty());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_unregister_twice_reports_false() {
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(RecordingSink::new())));
        let mut events = ExchangeEvents::new();
        let first = events.register(Arc::clone(&dispatcher));
        let second = events.register(dispatcher);

        assert!(events.unregister(first));
        assert_eq!(events.len(), 1);
        assert!(events.unregister(second));
        assert!(events.is_empty());
    }
}
