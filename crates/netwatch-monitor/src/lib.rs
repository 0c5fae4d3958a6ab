//! netwatch-monitor: periodic network inventory monitor.
//!
//! Wraps nmap to discover hosts on a network segment, resolves reverse-DNS
//! names, and reconciles each cycle's results into the persistent device
//! table. A detached helper process serves the inventory over HTTP; this
//! crate only starts and stops it.

pub mod api;
pub mod config;
pub mod cycle;
pub mod error;
pub mod nmap_xml;
pub mod observe;
pub mod resolve;
pub mod scanner;
pub mod setup;
