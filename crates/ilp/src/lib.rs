//! Top-level facade crate for the ILP metrics service.
//!
//! Re-exports the domain core and the aggregator service so users can depend on a single crate.

pub mod core {
    pub use ilp_core::*;
}

pub mod aggregator {
    pub use ilp_aggregator::*;
}
