//! Nmap XML output deserialization.
//!
//! Nmap is invoked with `-oX -` so it writes structured XML to stdout.
//! This module provides typed structs that deserialize from that XML
//! using `quick-xml` with serde.

use serde::Deserialize;

use crate::error::{MonitorError, Result};

/// Root element: `<nmaprun>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "nmaprun")]
pub struct NmapRun {
    #[serde(rename = "@scanner")]
    pub scanner: Option<String>,
    #[serde(rename = "@args")]
    pub args: Option<String>,
    #[serde(rename = "host", default)]
    pub hosts: Vec<NmapHost>,
    pub runstats: Option<RunStats>,
}

/// A single host from scan results.
#[derive(Debug, Clone, Deserialize)]
pub struct NmapHost {
    pub status: Option<HostStatus>,
    #[serde(rename = "address", default)]
    pub addresses: Vec<Address>,
    pub hostnames: Option<Hostnames>,
    pub ports: Option<Ports>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HostStatus {
    #[serde(rename = "@state")]
    pub state: String,
    #[serde(rename = "@reason")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    #[serde(rename = "@addr")]
    pub addr: String,
    #[serde(rename = "@addrtype")]
    pub addr_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hostnames {
    #[serde(rename = "hostname", default)]
    pub hostnames: Vec<Hostname>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Hostname {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@type")]
    pub hostname_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ports {
    #[serde(rename = "port", default)]
    pub ports: Vec<NmapPort>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmapPort {
    #[serde(rename = "@protocol")]
    pub protocol: String,
    #[serde(rename = "@portid")]
    pub port_id: u16,
    pub state: PortState,
    pub service: Option<NmapService>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortState {
    #[serde(rename = "@state")]
    pub state: String,
    #[serde(rename = "@reason")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NmapService {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@product")]
    pub product: Option<String>,
    #[serde(rename = "@version")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunStats {
    pub finished: Option<Finished>,
    pub hosts: Option<RunStatsHosts>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Finished {
    #[serde(rename = "@elapsed")]
    pub elapsed: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunStatsHosts {
    #[serde(rename = "@up")]
    pub up: Option<String>,
    #[serde(rename = "@down")]
    pub down: Option<String>,
    #[serde(rename = "@total")]
    pub total: Option<String>,
}

impl NmapHost {
    /// Extract the textual IP address: IPv4 if present, else IPv6.
    pub fn addr(&self) -> Option<&str> {
        self.addresses
            .iter()
            .find(|a| a.addr_type == "ipv4")
            .or_else(|| self.addresses.iter().find(|a| a.addr_type == "ipv6"))
            .map(|a| a.addr.as_str())
    }

    /// Extract the first hostname, if present.
    pub fn hostname(&self) -> Option<&str> {
        self.hostnames
            .as_ref()
            .and_then(|hn| hn.hostnames.first())
            .map(|h| h.name.as_str())
    }

    /// Check if the host is up.
    pub fn is_up(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.state == "up")
    }
}

/// Parse nmap XML bytes into a structured `NmapRun`.
pub fn parse_nmap_xml(xml: &[u8]) -> Result<NmapRun> {
    quick_xml::de::from_reader(xml).map_err(|e| MonitorError::XmlParse(format!("{e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE_SCAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap -sV -p 22,80,443 -T5 10.0.0.0/24">
  <host>
    <status state="up" reason="syn-ack"/>
    <address addr="10.0.0.1" addrtype="ipv4"/>
    <hostnames>
      <hostname name="gateway.local" type="PTR"/>
    </hostnames>
    <ports>
      <port protocol="tcp" portid="22">
        <state state="open" reason="syn-ack"/>
        <service name="ssh" product="OpenSSH" version="9.6"/>
      </port>
      <port protocol="tcp" portid="80">
        <state state="open" reason="syn-ack"/>
        <service name="http" product="nginx" version="1.24.0"/>
      </port>
      <port protocol="tcp" portid="443">
        <state state="filtered" reason="no-response"/>
      </port>
    </ports>
  </host>
  <host>
    <status state="down" reason="no-response"/>
    <address addr="10.0.0.9" addrtype="ipv4"/>
  </host>
  <runstats>
    <finished elapsed="12.41"/>
    <hosts up="1" down="1" total="2"/>
  </runstats>
</nmaprun>"#;

    #[test]
    fn test_parse_service_scan() {
        let run = parse_nmap_xml(SERVICE_SCAN_XML.as_bytes()).unwrap();
        assert_eq!(run.hosts.len(), 2);

        let gateway = &run.hosts[0];
        assert!(gateway.is_up());
        assert_eq!(gateway.addr(), Some("10.0.0.1"));
        assert_eq!(gateway.hostname(), Some("gateway.local"));

        let ports = gateway.ports.as_ref().unwrap();
        assert_eq!(ports.ports.len(), 3);

        let ssh = &ports.ports[0];
        assert_eq!(ssh.port_id, 22);
        assert_eq!(ssh.protocol, "tcp");
        assert_eq!(ssh.state.state, "open");
        let svc = ssh.service.as_ref().unwrap();
        assert_eq!(svc.name, "ssh");
        assert_eq!(svc.product.as_deref(), Some("OpenSSH"));
        assert_eq!(svc.version.as_deref(), Some("9.6"));

        let filtered = &ports.ports[2];
        assert_eq!(filtered.state.state, "filtered");
        assert!(filtered.service.is_none());

        let down = &run.hosts[1];
        assert!(!down.is_up());
        assert_eq!(down.addr(), Some("10.0.0.9"));

        let stats = run.runstats.unwrap().hosts.unwrap();
        assert_eq!(stats.up.as_deref(), Some("1"));
        assert_eq!(stats.total.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_empty_scan() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap -sV -p 1-1024 192.168.99.0/24">
  <runstats>
    <finished elapsed="1.00"/>
    <hosts up="0" down="256" total="256"/>
  </runstats>
</nmaprun>"#;

        let run = parse_nmap_xml(xml.as_bytes()).unwrap();
        assert!(run.hosts.is_empty());
    }

    #[test]
    fn test_ipv6_fallback() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<nmaprun scanner="nmap">
  <host>
    <status state="up"/>
    <address addr="fe80::1" addrtype="ipv6"/>
  </host>
</nmaprun>"#;

        let run = parse_nmap_xml(xml.as_bytes()).unwrap();
        assert_eq!(run.hosts[0].addr(), Some("fe80::1"));
    }

    #[test]
    fn test_host_without_hostname() {
        let host = NmapHost {
            status: Some(HostStatus {
                state: "up".to_string(),
                reason: None,
            }),
            addresses: vec![Address {
                addr: "10.0.0.5".to_string(),
                addr_type: "ipv4".to_string(),
            }],
            hostnames: None,
            ports: None,
        };

        assert_eq!(host.addr(), Some("10.0.0.5"));
        assert_eq!(host.hostname(), None);
        assert!(host.is_up());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(parse_nmap_xml(b"not xml at all <<<").is_err());
    }
}
