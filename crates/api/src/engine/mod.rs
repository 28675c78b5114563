//! Booking engine.
//!
//! Everything that reads or writes the booking ledger on behalf of a request
//! goes through here: the occupancy projector, the spot allocator, the
//! release handler and the lot registry. Handlers stay thin and only map
//! HTTP input onto these functions.

pub mod allocator;
pub mod lot_registry;
pub mod occupancy;
pub mod release;
