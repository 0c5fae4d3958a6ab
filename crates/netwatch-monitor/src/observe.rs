//! Convert raw nmap output into reconciliation-ready observations.

use netwatch_core::{DeviceStatus, Fingerprint, Observation, PortObservation};

use crate::nmap_xml::{NmapHost, NmapRun};

/// A host as reported by one scan, before name resolution.
#[derive(Debug, Clone)]
pub struct ScannedHost {
    pub ip: String,
    pub status: DeviceStatus,
    /// Serialized fingerprint document for this host.
    pub fingerprint: String,
}

impl ScannedHost {
    /// Attach the resolved domain to produce a full observation.
    pub fn into_observation(self, domain: Option<String>) -> Observation {
        Observation {
            ip: self.ip,
            status: self.status,
            fingerprint: self.fingerprint,
            domain,
        }
    }
}

/// Extract every addressable host from the scan output.
///
/// Hosts are recorded with whatever state nmap reported; hosts with no
/// usable address are skipped. The fingerprint captures the hostname and
/// each port's number, state, service name, product, and version.
pub fn collect(run: &NmapRun) -> Vec<ScannedHost> {
    run.hosts.iter().filter_map(convert_host).collect()
}

fn convert_host(host: &NmapHost) -> Option<ScannedHost> {
    let ip = host.addr()?;
    let status = if host.is_up() {
        DeviceStatus::Up
    } else {
        DeviceStatus::Down
    };

    let mut fingerprint = Fingerprint::new(host.hostname().unwrap_or_default());
    if let Some(ports) = &host.ports {
        for port in &ports.ports {
            let (name, product, version) = match &port.service {
                Some(svc) => (
                    svc.name.clone(),
                    svc.product.clone().unwrap_or_default(),
                    svc.version.clone().unwrap_or_default(),
                ),
                None => (String::new(), String::new(), String::new()),
            };
            fingerprint.ports.push(PortObservation {
                port: port.port_id,
                protocol: port.protocol.clone(),
                state: port.state.state.clone(),
                name,
                product,
                version,
            });
        }
    }

    Some(ScannedHost {
        ip: ip.to_string(),
        status,
        fingerprint: fingerprint.into_document(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmap_xml::parse_nmap_xml;

    const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap">
  <host>
    <status state="up" reason="syn-ack"/>
    <address addr="10.0.0.1" addrtype="ipv4"/>
    <hostnames><hostname name="web.local" type="PTR"/></hostnames>
    <ports>
      <port protocol="tcp" portid="80">
        <state state="open" reason="syn-ack"/>
        <service name="http" product="nginx" version="1.24"/>
      </port>
      <port protocol="tcp" portid="22">
        <state state="closed" reason="reset"/>
      </port>
    </ports>
  </host>
  <host>
    <status state="down" reason="no-response"/>
    <address addr="10.0.0.2" addrtype="ipv4"/>
  </host>
</nmaprun>"#;

    #[test]
    fn test_collect_reports_all_addressable_hosts() {
        let run = parse_nmap_xml(XML.as_bytes()).unwrap();
        let scanned = collect(&run);

        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].ip, "10.0.0.1");
        assert_eq!(scanned[0].status, DeviceStatus::Up);
        assert_eq!(scanned[1].ip, "10.0.0.2");
        assert_eq!(scanned[1].status, DeviceStatus::Down);
    }

    #[test]
    fn test_fingerprint_content() {
        let run = parse_nmap_xml(XML.as_bytes()).unwrap();
        let scanned = collect(&run);

        // Ports come out sorted, so 22 precedes 80 even though nmap
        // reported 80 first.
        assert_eq!(
            scanned[0].fingerprint,
            r#"{"hostname":"web.local","ports":[{"port":22,"protocol":"tcp","state":"closed","name":"","product":"","version":""},{"port":80,"protocol":"tcp","state":"open","name":"http","product":"nginx","version":"1.24"}]}"#
        );

        // Portless host still carries a well-formed document.
        assert_eq!(
            scanned[1].fingerprint,
            r#"{"hostname":"","ports":[]}"#
        );
    }

    #[test]
    fn test_identical_scans_produce_identical_fingerprints() {
        let run = parse_nmap_xml(XML.as_bytes()).unwrap();
        let first = collect(&run);
        let second = collect(&run);
        assert_eq!(first[0].fingerprint, second[0].fingerprint);
    }

    #[test]
    fn test_into_observation_attaches_domain() {
        let run = parse_nmap_xml(XML.as_bytes()).unwrap();
        let host = collect(&run).remove(0);
        let obs = host.into_observation(Some("web.example.net".to_string()));
        assert_eq!(obs.ip, "10.0.0.1");
        assert_eq!(obs.domain.as_deref(), Some("web.example.net"));
    }
}
