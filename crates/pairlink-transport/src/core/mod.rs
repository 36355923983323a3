//! Transport contract and shared state

mod listeners;
mod state;
mod traits;

pub use listeners::{Listener, ListenerRegistry};
pub use state::TransportCore;
pub use traits::Transport;
