use std::cell::RefCell;
use crate::event::{BoardEvent, EventHandler};

/// Fans board events out to subscribed handlers.
///
/// Handlers run synchronously in subscription order on the thread that owns
/// the board. Subscribing takes `&self` so a handler can be added while the
/// board is borrowed immutably.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventBus({} handlers)", self.handler_count())
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    pub fn emit(&self, event: BoardEvent) {
        self.handlers
            .borrow_mut()
            .iter_mut()
            .for_each(|handler| handler.handle_event(&event));
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}
