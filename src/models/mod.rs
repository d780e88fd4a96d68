// Relay Models
// Data structures for the broadcast relay

mod broadcast;

pub use broadcast::*;
