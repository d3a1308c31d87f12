//! Types that mirror the monitoring API's JSON schema.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// What kind of check the server runs against a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    Http,
    Tcp,
    Icmp,
    /// A kind newer than this client, kept as the server spelled it.
    Other(String),
}

impl TargetKind {
    /// Kinds offered by the add form, in cycling order.
    pub const CHOICES: [TargetKind; 3] = [TargetKind::Http, TargetKind::Tcp, TargetKind::Icmp];

    pub fn as_str(&self) -> &str {
        match self {
            TargetKind::Http => "http",
            TargetKind::Tcp => "tcp",
            TargetKind::Icmp => "icmp",
            TargetKind::Other(s) => s,
        }
    }

    pub fn requires_port(&self) -> bool {
        matches!(self, TargetKind::Tcp)
    }

    fn from_wire(s: String) -> Self {
        let known = match s.as_str() {
            "http" => Some(TargetKind::Http),
            "tcp" => Some(TargetKind::Tcp),
            "icmp" => Some(TargetKind::Icmp),
            _ => None,
        };
        known.unwrap_or(TargetKind::Other(s))
    }
}

impl Serialize for TargetKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TargetKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TargetKind::from_wire)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(TargetKind::Http),
            "tcp" => Ok(TargetKind::Tcp),
            "icmp" => Ok(TargetKind::Icmp),
            other => Err(format!("Unknown target type: {other}")),
        }
    }
}

/// A monitoring target as stored by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub target: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Create draft; the server assigns the id. `port` is always sent, as null when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTarget {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub target: String,
    pub port: Option<u16>,
    pub enabled: bool,
}
