//! Vendor intelligence engine for a sourcing/procurement platform.
//!
//! The crate computes three families of derived data over a snapshot of the
//! vendor store: a persisted 0-100 trust score, a per-vendor delivery risk
//! assessment with categorical alerts, and a regulatory document compliance
//! report exportable as JSON or CSV. Everything reaches the vendor data
//! through the [`intelligence::VendorRepository`] capability, so the
//! services can be exercised against in-memory fixtures.

pub mod config;
pub mod error;
pub mod intelligence;
pub mod telemetry;
