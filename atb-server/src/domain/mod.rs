//! Domain types for the bus stop API.
//!
//! These are the validated shapes served to clients. Raw AtB records are
//! converted into them by `atb::convert`.

mod departure;
mod node_id;
mod stop;

pub use departure::{Departure, Departures};
pub use node_id::{InvalidNodeId, NodeId};
pub use stop::{BusStop, BusStops};

#[cfg(test)]
pub(crate) use stop::test_stop;
