//! Domain core of the bookings service.
//!
//! Holds the booking domain types, guest form validation, the availability
//! service and the multi-step booking workflow, together with the storage
//! and draft-store ports they depend on. Nothing here talks to a database
//! directly; adapters live in `bookings-db`.

pub mod availability;
pub mod booking;
pub mod deadline;
pub mod draft;
pub mod error;
pub mod memory;
pub mod ports;
pub mod stay;
pub mod types;
pub mod validation;
pub mod workflow;
