//! netwatch-core: Shared types for the netwatch inventory monitor.
//!
//! This crate provides the domain types used across the netwatch components:
//! - `DeviceRecord` / `DeviceStatus` for rows in the inventory table
//! - `Fingerprint` for the serialized per-host service snapshot
//! - `Observation` for a single host as seen in one scan cycle

pub mod fingerprint;
pub mod types;

pub use fingerprint::{Fingerprint, PortObservation};
pub use types::{DeviceRecord, DeviceStatus, Observation};
