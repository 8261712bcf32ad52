use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use panfm_contracts::FirewallError;

/// A minimal parsed XML element tree: enough to walk PAN-OS's nested
/// `<response><result><system>...` shape without pulling in a full DOM
/// crate. Text-only leaves are the common case; `children` holds repeated
/// sibling tags (e.g. `<entry>` lists) in document order.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub children: Vec<(String, Element)>,
}

impl Element {
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn text_opt(&self) -> Option<String> {
        let trimmed = self.text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Walks a dotted path of child tag names, returning the leaf element.
    pub fn path(&self, path: &[&str]) -> Option<&Element> {
        let mut current = self;
        for segment in path {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn text_at(&self, path: &[&str]) -> Option<String> {
        self.path(path).and_then(|e| e.text_opt())
    }

    pub fn f64_at(&self, path: &[&str]) -> Option<f64> {
        self.text_at(path).and_then(|s| s.parse().ok())
    }

    pub fn i64_at(&self, path: &[&str]) -> Option<i64> {
        self.text_at(path).and_then(|s| s.parse().ok())
    }
}

/// Parses a full XML document body into its root [`Element`].
pub fn parse(body: &str) -> Result<Element, FirewallError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = vec![Element::default()];
    let mut names: Vec<String> = vec![String::new()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_string();
                let mut element = Element::default();
                for attr in tag.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr.unescape_value().unwrap_or_default().to_string();
                    element.attrs.insert(key, value);
                }
                names.push(name);
                stack.push(element);
            }
            Ok(Event::Empty(tag)) => {
                let name = String::from_utf8_lossy(tag.name().as_ref()).to_string();
                let mut element = Element::default();
                for attr in tag.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = attr.unescape_value().unwrap_or_default().to_string();
                    element.attrs.insert(key, value);
                }
                if let Some(parent) = stack.last_mut() {
                    parent.children.push((name, element));
                }
            }
            Ok(Event::Text(text)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().expect("start/end pairs always balance");
                let name = names.pop().expect("start/end pairs always balance");
                if let Some(parent) = stack.last_mut() {
                    parent.children.push((name, element));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(FirewallError::BadResponse {
                    device: String::new(),
                    detail: format!("xml parse error: {e}"),
                })
            }
        }
    }

    let root = stack.pop().unwrap_or_default();
    root.children
        .into_iter()
        .next()
        .map(|(_, e)| e)
        .ok_or_else(|| FirewallError::BadResponse {
            device: String::new(),
            detail: "empty xml document".to_string(),
        })
}

/// Validates the outer `<response status="..." code="...">` envelope every
/// PAN-OS API call wraps its payload in, classifying a `status="error"`
/// into the right [`FirewallError`] variant rather than surfacing raw XML.
pub fn check_response_status(device: &str, response: &Element) -> Result<(), FirewallError> {
    let status = response.attrs.get("status").map(String::as_str).unwrap_or("");
    if status == "success" {
        return Ok(());
    }

    let code = response.attrs.get("code").cloned().unwrap_or_default();
    let detail = response
        .child("msg")
        .and_then(|m| m.text_opt())
        .unwrap_or_else(|| "unknown error".to_string());

    match code.as_str() {
        "403" | "16" => Err(FirewallError::AuthFailed { device: device.to_string() }),
        "429" => Err(FirewallError::RateLimited { device: device.to_string() }),
        _ => Err(FirewallError::BadResponse { device: device.to_string(), detail }),
    }
}

/// Builds the `cmd=` query fragment for each operation, mirroring the
/// per-call XML strings `firewall_api.py`'s specialized modules construct.
pub mod commands {
    pub const SYSTEM_INFO: &str = "<show><system><info></info></system></show>";
    pub const RESOURCES: &str = "<show><system><resources></resources></system></show>";
    pub const INTERFACES: &str = "<show><interface>all</interface></show>";
    pub const ARP_TABLE: &str = "<show><arp><entry name='all'/></arp></show>";
    pub const DHCP_LEASES: &str = "<show><dhcp><server><lease><all></all></lease></server></dhcp></show>";
    pub const SESSION_INFO: &str = "<show><session><info></info></session></show>";
    pub const LICENSES: &str = "<request><license><info></info></license></request>";
    pub const SOFTWARE_INFO: &str = "<request><system><software><info></info></software></system></request>";
    pub const CONTENT_UPDATES: &str = "<request><content><upgrade><check></check></upgrade></content></request>";

    pub fn threat_logs(max: u32) -> String {
        format!(
            "<log-type>threat</log-type><direction>backward</direction><nlogs>{max}</nlogs>"
        )
    }

    pub fn traffic_logs(max: u32) -> String {
        format!(
            "<log-type>traffic</log-type><direction>backward</direction><nlogs>{max}</nlogs>"
        )
    }

    pub fn system_logs(max: u32) -> String {
        format!(
            "<log-type>system</log-type><direction>backward</direction><nlogs>{max}</nlogs>"
        )
    }

    pub fn tech_support_status(job_id: &str) -> String {
        format!("<show><jobs><id>{job_id}</id></jobs></show>")
    }

    pub const TECH_SUPPORT_START: &str =
        "<export><tech-support><format>encrypted</format></tech-support></export>";
}
