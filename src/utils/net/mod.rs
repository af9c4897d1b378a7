//! Network utilities

pub mod outbound;

pub use outbound::{OutboundClient, OutboundDecision, OutboundPolicy};
