//! The per-host service fingerprint document.
//!
//! A fingerprint is a snapshot of a host's hostname and observed ports
//! (number, state, service name, product, version) from a single scan.
//! It is serialized to JSON once, stored as an opaque blob, and compared
//! byte-for-byte on later cycles to decide whether anything changed.

use serde::{Deserialize, Serialize};

/// One observed port with its service identification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct PortObservation {
    pub port: u16,
    pub protocol: String,
    pub state: String,
    pub name: String,
    /// Empty string when the scanner reported no product, matching the
    /// stored document shape exactly so comparisons stay stable.
    pub product: String,
    pub version: String,
}

/// Snapshot of a single host from one scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fingerprint {
    pub hostname: String,
    pub ports: Vec<PortObservation>,
}

impl Fingerprint {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ports: Vec::new(),
        }
    }

    /// Serialize to the canonical document form.
    ///
    /// Ports are sorted before serialization so that the same set of
    /// observations always produces identical bytes, regardless of the
    /// order the scanner reported them in. Struct field order is fixed,
    /// so the byte-for-byte change check never fires spuriously.
    pub fn into_document(mut self) -> String {
        self.ports.sort();
        serde_json::to_string(&self).expect("fingerprint serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(number: u16, name: &str) -> PortObservation {
        PortObservation {
            port: number,
            protocol: "tcp".to_string(),
            state: "open".to_string(),
            name: name.to_string(),
            product: String::new(),
            version: String::new(),
        }
    }

    #[test]
    fn test_document_shape() {
        let mut fp = Fingerprint::new("web.local");
        fp.ports.push(PortObservation {
            port: 22,
            protocol: "tcp".to_string(),
            state: "open".to_string(),
            name: "ssh".to_string(),
            product: "OpenSSH".to_string(),
            version: "9.6".to_string(),
        });
        let doc = fp.into_document();
        assert_eq!(
            doc,
            r#"{"hostname":"web.local","ports":[{"port":22,"protocol":"tcp","state":"open","name":"ssh","product":"OpenSSH","version":"9.6"}]}"#
        );
    }

    #[test]
    fn test_port_order_does_not_change_document() {
        let mut a = Fingerprint::new("host");
        a.ports.push(port(443, "https"));
        a.ports.push(port(22, "ssh"));

        let mut b = Fingerprint::new("host");
        b.ports.push(port(22, "ssh"));
        b.ports.push(port(443, "https"));

        assert_eq!(a.into_document(), b.into_document());
    }

    #[test]
    fn test_different_ports_change_document() {
        let mut a = Fingerprint::new("host");
        a.ports.push(port(22, "ssh"));

        let mut b = Fingerprint::new("host");
        b.ports.push(port(23, "telnet"));

        assert_ne!(a.into_document(), b.into_document());
    }

    #[test]
    fn test_empty_fingerprint() {
        let doc = Fingerprint::new("").into_document();
        assert_eq!(doc, r#"{"hostname":"","ports":[]}"#);
    }
}
