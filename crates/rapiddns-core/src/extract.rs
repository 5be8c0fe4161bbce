//! Subdomain and IP extraction over a [`RecordSet`].

use std::collections::{BTreeMap, BTreeSet};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::{Ipv4Network, Ipv6Network};
use serde::Serialize;

use crate::types::RecordSet;

/// Prefix length IPv4 addresses are grouped by
pub const IPV4_SUBNET_PREFIX: u8 = 24;

/// Prefix length IPv6 addresses are grouped by
pub const IPV6_SUBNET_PREFIX: u8 = 64;

/// Distinct-IP counts per subnet, ordered by subnet key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubnetStats(BTreeMap<String, usize>);

impl SubnetStats {
    /// Count for one subnet key (e.g. `"1.2.3.0/24"`)
    #[must_use]
    pub fn get(&self, subnet: &str) -> Option<usize> {
        self.0.get(subnet).copied()
    }

    /// Number of subnets
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no subnets were seen
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(subnet, count)` in lexicographic subnet order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn add(&mut self, ip: IpAddr) {
        *self.0.entry(subnet_key(ip)).or_default() += 1;
    }
}

/// Unique IPs found in record values plus their subnet aggregation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IpExtraction {
    /// Unique IP strings, sorted lexicographically
    pub ips: Vec<String>,

    /// Distinct IPs per `/24` (IPv4) or `/64` (IPv6) subnet
    pub subnets: SubnetStats,
}

/// Unique non-empty subdomains, sorted lexicographically
#[must_use]
pub fn subdomains(set: &RecordSet) -> Vec<String> {
    set.iter()
        .filter(|r| !r.subdomain.is_empty())
        .map(|r| r.subdomain.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Unique record values that parse as IP addresses, with subnet counts.
///
/// Deduplication is by exact string, so two spellings of one address count twice.
#[must_use]
pub fn ips(set: &RecordSet) -> IpExtraction {
    let unique: BTreeMap<&str, IpAddr> = set
        .iter()
        .filter_map(|r| Some((r.value.as_str(), r.as_ip()?)))
        .collect();

    let mut subnets = SubnetStats::default();
    for ip in unique.values() {
        subnets.add(*ip);
    }

    IpExtraction {
        ips: unique.into_keys().map(String::from).collect(),
        subnets,
    }
}

/// Subnet key for an address; IPv4-mapped IPv6 addresses group as IPv4
#[must_use]
pub fn subnet_key(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => ipv4_key(v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or_else(|| ipv6_key(v6), ipv4_key),
    }
}

fn ipv4_key(ip: Ipv4Addr) -> String {
    Ipv4Network::new(ip, IPV4_SUBNET_PREFIX).map_or_else(
        |_| format!("{ip}/32"),
        |net| format!("{}/{IPV4_SUBNET_PREFIX}", net.network()),
    )
}

fn ipv6_key(ip: Ipv6Addr) -> String {
    Ipv6Network::new(ip, IPV6_SUBNET_PREFIX).map_or_else(
        |_| format!("{ip}/128"),
        |net| format!("{}/{IPV6_SUBNET_PREFIX}", net.network()),
    )
}
