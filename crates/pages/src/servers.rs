//! VPS servers page.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;

use opsdesk_assets::{ServerForm, VpsServer};
use opsdesk_core::{Money, UsageHealth};

use crate::RecordPage;
use crate::mock::id;

pub type ServersPage = RecordPage<ServerForm>;

#[allow(clippy::too_many_arguments)]
fn server(
    n: u128,
    name: &str,
    provider: &str,
    ip_address: IpAddr,
    region: &str,
    (cpu_cores, ram_gb, disk_gb): (u32, u32, u32),
    (cpu_usage, memory_usage, disk_usage): (f64, f64, f64),
    monthly_cents: i64,
) -> VpsServer {
    VpsServer {
        id: id(3, n),
        name: name.to_string(),
        provider: provider.to_string(),
        ip_address,
        region: region.to_string(),
        cpu_cores,
        ram_gb,
        disk_gb,
        cpu_usage,
        memory_usage,
        disk_usage,
        monthly_cost: Money::from_cents(monthly_cents),
    }
}

pub fn mock_servers() -> Vec<VpsServer> {
    vec![
        server(
            1,
            "web-prod-01",
            "DigitalOcean",
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 10)),
            "fra1",
            (4, 8, 160),
            (45.0, 62.0, 71.0),
            4_800,
        ),
        server(
            2,
            "db-prod-01",
            "Hetzner",
            IpAddr::V4(Ipv4Addr::new(203, 0, 113, 20)),
            "nbg1",
            (8, 32, 480),
            (78.0, 91.0, 64.0),
            8_990,
        ),
        server(
            3,
            "worker-01",
            "Linode",
            IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)),
            "us-east",
            (2, 4, 80),
            (35.0, 48.0, 82.0),
            2_400,
        ),
        server(
            4,
            "staging-01",
            "Vultr",
            IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 0x10)),
            "ams",
            (2, 4, 80),
            (12.0, 30.0, 40.0),
            2_000,
        ),
    ]
}

pub fn servers_page() -> ServersPage {
    RecordPage::new(mock_servers())
}

/// Servers at or above `health`, worst first.
pub fn needing_attention(page: &ServersPage, health: UsageHealth) -> Vec<&VpsServer> {
    let mut rows = page.visible_by(|s| s.health() >= health);
    rows.sort_by(|a, b| b.peak_usage().total_cmp(&a.peak_usage()));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerSummary {
    pub total: usize,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    pub avg_disk: f64,
    pub warning: usize,
    pub critical: usize,
    pub monthly_cost: Money,
}

impl ServerSummary {
    pub fn of(servers: &[VpsServer]) -> Self {
        let avg = |usage: fn(&VpsServer) -> f64| {
            if servers.is_empty() {
                0.0
            } else {
                servers.iter().map(usage).sum::<f64>() / servers.len() as f64
            }
        };
        let count = |health| servers.iter().filter(|s| s.health() == health).count();

        Self {
            total: servers.len(),
            avg_cpu: avg(|s| s.cpu_usage),
            avg_memory: avg(|s| s.memory_usage),
            avg_disk: avg(|s| s.disk_usage),
            warning: count(UsageHealth::Warning),
            critical: count(UsageHealth::Critical),
            monthly_cost: servers.iter().map(|s| s.monthly_cost).sum(),
        }
    }
}
