mod bus;
mod events;
mod handlers;

pub use bus::EventBus;
pub use events::BoardEvent;
pub use handlers::DirtyFlag;

pub trait EventHandler {
    fn handle_event(&mut self, event: &BoardEvent);
}
