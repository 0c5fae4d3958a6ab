//! netwatch-store: relational inventory store for the device table.
//!
//! This crate is the single mutation point for the `devices` table. All
//! reads and writes flow through [`InventoryStore`], and the per-cycle
//! reconciliation runs inside one transaction so a scan cycle commits
//! together or not at all.

pub mod client;
pub mod device;
pub mod reconcile;

pub use client::{InventoryStore, StoreConfig, StoreError};
pub use reconcile::ReconcileSummary;
