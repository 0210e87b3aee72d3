//! VLAN input handling.
//!
//! Reads VLAN definitions from CSV rows of
//! `vlan_number, vlan_name, description, gateway_cidr`, validates them, and
//! groups VLAN numbers into contiguous ranges for pool encap blocks.

use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::constants;

/// Errors raised while reading or validating VLAN input.
#[derive(Debug, Error)]
pub enum VlanError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected 4 fields (vlan_number, vlan_name, description, gateway_cidr), found {found}")]
    MissingFields { line: u64, found: usize },
    #[error("line {line}: {source}")]
    Row {
        line: u64,
        #[source]
        source: Box<VlanError>,
    },
    #[error("invalid VLAN number '{0}'")]
    InvalidNumber(String),
    #[error("VLAN {0} is outside the valid range 1-4094")]
    OutOfRange(u32),
    #[error("VLAN name must not be empty")]
    EmptyName,
    #[error("invalid gateway '{0}', expected X.X.X.X/N")]
    InvalidGateway(String),
}

/// A gateway address with its prefix length, e.g. `10.100.1.1/24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gateway {
    pub addr: IpAddr,
    pub prefix_len: u8,
}

impl FromStr for Gateway {
    type Err = VlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VlanError::InvalidGateway(s.to_string());
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let prefix_len: u8 = prefix.parse().map_err(|_| invalid())?;

        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            return Err(invalid());
        }

        Ok(Self { addr, prefix_len })
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// One VLAN to be turned into a bridge domain and EPG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanEntry {
    pub number: u16,
    pub name: String,
    pub description: String,
    pub gateway: Option<Gateway>,
}

impl VlanEntry {
    /// Validate raw field values into an entry. An empty gateway is `None`.
    pub fn parse(
        number: &str,
        name: &str,
        description: &str,
        gateway: &str,
    ) -> Result<Self, VlanError> {
        Self::new(parse_vlan_number(number)?, name, description, gateway)
    }

    /// Like [`VlanEntry::parse`] for an already numeric VLAN.
    pub fn new(
        number: u16,
        name: &str,
        description: &str,
        gateway: &str,
    ) -> Result<Self, VlanError> {
        if !(constants::VLAN_MIN..=constants::VLAN_MAX).contains(&number) {
            return Err(VlanError::OutOfRange(u32::from(number)));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(VlanError::EmptyName);
        }

        let gateway = match gateway.trim() {
            "" => None,
            g => Some(g.parse()?),
        };

        Ok(Self {
            number,
            name: name.to_string(),
            description: description.trim().to_string(),
            gateway,
        })
    }
}

/// An inclusive range of VLAN numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanRange {
    pub from: u16,
    pub to: u16,
}

impl fmt::Display for VlanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

fn parse_vlan_number(raw: &str) -> Result<u16, VlanError> {
    let raw = raw.trim();
    let n: u32 = raw
        .parse()
        .map_err(|_| VlanError::InvalidNumber(raw.to_string()))?;
    u16::try_from(n).map_err(|_| VlanError::OutOfRange(n))
}

/// Load VLAN entries from a CSV file.
pub fn load_csv(path: &Path) -> Result<Vec<VlanEntry>, VlanError> {
    let content = std::fs::read_to_string(path).map_err(|source| VlanError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(&content)
}

/// Parse CSV content. Records whose first field is not a number (headers,
/// comments, blank lines) are skipped. Quoted fields may span lines.
pub fn parse_csv(content: &str) -> Result<Vec<VlanEntry>, VlanError> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let first = record.get(0).unwrap_or_default();
        if first.is_empty() || !first.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }

        if record.len() < 4 {
            return Err(VlanError::MissingFields {
                line,
                found: record.len(),
            });
        }

        let entry = VlanEntry::parse(&record[0], &record[1], &record[2], &record[3]).map_err(
            |e| VlanError::Row {
                line,
                source: Box::new(e),
            },
        )?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Group VLAN numbers into contiguous inclusive ranges.
///
/// Input is sorted and deduplicated first, so `[105, 100, 101, 102, 101]`
/// yields `[100-102, 105]`.
pub fn group_ranges(vlans: &[u16]) -> Vec<VlanRange> {
    let mut sorted = vlans.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges: Vec<VlanRange> = Vec::new();
    for n in sorted {
        match ranges.last_mut() {
            Some(range) if range.to.checked_add(1) == Some(n) => range.to = n,
            _ => ranges.push(VlanRange { from: n, to: n }),
        }
    }
    ranges
}
