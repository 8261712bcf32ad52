//! Turns the raw PAN-OS traffic log entries `FirewallClient::traffic_logs`
//! hands back (flattened XML, field name -> string) into the typed rows the
//! store expects. Grounded in `throughput_collector.py`'s
//! `_collect_application_statistics`, which does the same aggregation in
//! Python by reading `details_json` back out of already-stored traffic
//! logs; here the aggregation runs once, straight off the fresh batch.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use panfm_model::{ApplicationSample, CategoryBandwidth, ClientBandwidth, DeviceId, TrafficFlow};
use serde_json::Value;

fn field<'a>(entry: &'a Value, name: &str) -> Option<&'a str> {
    entry.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn field_i64(entry: &Value, name: &str) -> i64 {
    field(entry, name).and_then(|s| s.parse().ok()).unwrap_or(0)
}

/// VLAN id embedded in an interface name (`ethernet1/1.100` -> `"100"`),
/// matching the original's interface-suffix parsing in
/// `_collect_application_statistics`.
fn vlan_from_interface(interface: Option<&str>) -> Option<String> {
    let interface = interface?;
    let (_, suffix) = interface.rsplit_once('.')?;
    suffix.chars().all(|c| c.is_ascii_digit()).then(|| suffix.to_string())
}

fn is_private(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().map(|addr| addr.is_private() || addr.is_loopback()).unwrap_or(false)
}

/// `"internal"` when both ends stay inside RFC1918 space, `"internet"`
/// otherwise — the split the original's `top_internal`/`top_internet`
/// client queries rely on.
fn traffic_type(source_ip: &str, dest_ip: &str) -> &'static str {
    if is_private(source_ip) && is_private(dest_ip) {
        "internal"
    } else {
        "internet"
    }
}

pub fn entries_to_traffic_flows(device_id: DeviceId, entries: &[Value], time: DateTime<Utc>) -> Vec<TrafficFlow> {
    entries
        .iter()
        .filter_map(|entry| {
            let source_ip = field(entry, "src")?.to_string();
            let dest_ip = field(entry, "dst")?.to_string();
            let bytes_sent = field_i64(entry, "bytes_sent");
            let bytes_received = field_i64(entry, "bytes_received");

            Some(TrafficFlow {
                time,
                device_id,
                source_ip,
                dest_ip,
                dest_port: field(entry, "dport").and_then(|s| s.parse().ok()),
                application: field(entry, "app").unwrap_or("unknown").to_string(),
                category: field(entry, "category").map(str::to_string),
                protocol: field(entry, "proto").map(str::to_string),
                bytes_sent,
                bytes_received,
                bytes_total: bytes_sent + bytes_received,
                sessions: 1,
                source_zone: field(entry, "from").map(str::to_string),
                dest_zone: field(entry, "to").map(str::to_string),
                source_vlan: vlan_from_interface(field(entry, "inbound_if")),
                dest_vlan: vlan_from_interface(field(entry, "outbound_if")),
                source_hostname: field(entry, "srcloc").map(str::to_string),
                dest_hostname: field(entry, "dstloc").map(str::to_string),
            })
        })
        .collect()
}

pub fn flows_to_application_samples(
    device_id: DeviceId,
    flows: &[TrafficFlow],
    time: DateTime<Utc>,
) -> Vec<ApplicationSample> {
    let mut by_app: HashMap<(&str, Option<&str>), (i64, i64)> = HashMap::new();
    for flow in flows {
        let key = (flow.application.as_str(), flow.category.as_deref());
        let entry = by_app.entry(key).or_insert((0, 0));
        entry.0 += flow.bytes_total;
        entry.1 += flow.sessions;
    }

    by_app
        .into_iter()
        .map(|((application, category), (bytes_total, sessions))| ApplicationSample {
            time,
            device_id,
            application: application.to_string(),
            category: category.map(str::to_string),
            bytes_total,
            sessions,
        })
        .collect()
}

pub fn flows_to_category_bandwidth(
    device_id: DeviceId,
    flows: &[TrafficFlow],
    time: DateTime<Utc>,
) -> Vec<CategoryBandwidth> {
    let mut by_category: HashMap<(&str, &str), i64> = HashMap::new();
    for flow in flows {
        let category = flow.category.as_deref().unwrap_or("unknown");
        let traffic_type = traffic_type(&flow.source_ip, &flow.dest_ip);
        *by_category.entry((category, traffic_type)).or_insert(0) += flow.bytes_total;
    }

    by_category
        .into_iter()
        .map(|((category, traffic_type), bytes_total)| CategoryBandwidth {
            time,
            device_id,
            category: category.to_string(),
            traffic_type: traffic_type.to_string(),
            bytes_total,
        })
        .collect()
}

pub fn flows_to_client_bandwidth(
    device_id: DeviceId,
    flows: &[TrafficFlow],
    time: DateTime<Utc>,
) -> Vec<ClientBandwidth> {
    let mut by_client: HashMap<(&str, &str), (i64, i64)> = HashMap::new();
    for flow in flows {
        let traffic_type = traffic_type(&flow.source_ip, &flow.dest_ip);
        let entry = by_client.entry((flow.source_ip.as_str(), traffic_type)).or_insert((0, 0));
        entry.0 += flow.bytes_sent;
        entry.1 += flow.bytes_received;
    }

    by_client
        .into_iter()
        .map(|((client_ip, traffic_type), (bytes_sent, bytes_received))| ClientBandwidth {
            time,
            device_id,
            client_ip: client_ip.to_string(),
            traffic_type: traffic_type.to_string(),
            bytes_sent,
            bytes_received,
            bytes_total: bytes_sent + bytes_received,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device_id() -> DeviceId {
        DeviceId(uuid::Uuid::nil())
    }

    #[test]
    fn parses_basic_flow_fields() {
        let entries = vec![json!({
            "src": "192.168.1.10",
            "dst": "8.8.8.8",
            "dport": "443",
            "app": "ssl",
            "proto": "tcp",
            "bytes_sent": "1000",
            "bytes_received": "2000",
            "category": "web-based-email",
            "inbound_if": "ethernet1/1.100",
        })];

        let flows = entries_to_traffic_flows(device_id(), &entries, Utc::now());
        assert_eq!(flows.len(), 1);
        let flow = &flows[0];
        assert_eq!(flow.dest_port, Some(443));
        assert_eq!(flow.bytes_total, 3000);
        assert_eq!(flow.source_vlan.as_deref(), Some("100"));
    }

    #[test]
    fn skips_entries_missing_addresses() {
        let entries = vec![json!({"app": "ssl"})];
        assert!(entries_to_traffic_flows(device_id(), &entries, Utc::now()).is_empty());
    }

    #[test]
    fn classifies_internal_vs_internet_traffic() {
        assert_eq!(traffic_type("192.168.1.1", "192.168.1.2"), "internal");
        assert_eq!(traffic_type("192.168.1.1", "8.8.8.8"), "internet");
    }

    #[test]
    fn aggregates_application_samples_across_flows() {
        let time = Utc::now();
        let flows = vec![
            TrafficFlow {
                time,
                device_id: device_id(),
                source_ip: "10.0.0.1".into(),
                dest_ip: "1.1.1.1".into(),
                dest_port: Some(443),
                application: "ssl".into(),
                category: Some("web".into()),
                protocol: Some("tcp".into()),
                bytes_sent: 100,
                bytes_received: 200,
                bytes_total: 300,
                sessions: 1,
                source_zone: None,
                dest_zone: None,
                source_vlan: None,
                dest_vlan: None,
                source_hostname: None,
                dest_hostname: None,
            };
            2
        ];

        let samples = flows_to_application_samples(device_id(), &flows, time);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].bytes_total, 600);
        assert_eq!(samples[0].sessions, 2);
    }
}
