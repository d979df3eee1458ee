//! Asynchronous coordination primitives
//!
//! | Primitive | Purpose |
//! |-----------|---------|
//! | [`FanInLatch`] | Wait for N concurrent sub-operations |
//! | [`SingleFlight`] | One in-flight load per key |

pub mod latch;
pub mod single_flight;

pub use latch::{FanInLatch, LatchTicket};
pub use single_flight::SingleFlight;
