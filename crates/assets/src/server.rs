use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use opsdesk_core::calc::{usage_health, UsageHealth};
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// A rented virtual server with its last reported resource usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpsServer {
    pub id: RecordId,
    pub name: String,
    pub provider: String,
    pub ip_address: IpAddr,
    pub region: String,
    pub cpu_cores: u32,
    pub ram_gb: u32,
    pub disk_gb: u32,
    /// Usage percentages, each 0–100.
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub monthly_cost: Money,
}

impl VpsServer {
    /// Highest of the three usage gauges.
    pub fn peak_usage(&self) -> f64 {
        self.cpu_usage.max(self.memory_usage).max(self.disk_usage)
    }

    pub fn health(&self) -> UsageHealth {
        usage_health(self.peak_usage())
    }

    pub fn cpu_health(&self) -> UsageHealth {
        usage_health(self.cpu_usage)
    }

    pub fn memory_health(&self) -> UsageHealth {
        usage_health(self.memory_usage)
    }

    pub fn disk_health(&self) -> UsageHealth {
        usage_health(self.disk_usage)
    }

    /// Disk space in use, in whole gigabytes.
    /// Never more than `disk_gb`; a NaN usage counts as empty.
    pub fn disk_used_gb(&self) -> u32 {
        let used = (f64::from(self.disk_gb) * self.disk_usage / 100.0).round();
        if used.is_nan() || used <= 0.0 {
            0
        } else if used >= f64::from(self.disk_gb) {
            self.disk_gb
        } else {
            // 0 < used < disk_gb, so the cast is exact.
            used as u32
        }
    }

    pub fn annual_cost(&self) -> Money {
        self.monthly_cost.scale(12, 1)
    }
}

impl Entity for VpsServer {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for VpsServer {
    const KIND: &'static str = "servers";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.provider.as_str(), self.region.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ServerForm;

impl ServerForm {
    fn capacity(state: &FormState, field: &str, label: &str, errors: &mut FieldErrors) -> Option<u32> {
        let value = state.count(field, label, None, errors)?;
        if value == 0 {
            errors.insert(field, format!("{label} must be at least 1"));
            return None;
        }
        Some(value)
    }
}

impl FormSchema for ServerForm {
    type Record = VpsServer;
    const TITLE: &'static str = "Add VPS Server";

    fn build(state: &FormState, ctx: &FormContext) -> Result<VpsServer, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = state.required_text("name", "Server name", &mut errors);
        let provider = state.required_text("provider", "Provider", &mut errors);
        let region = state.required_text("region", "Region", &mut errors);

        let ip_address = state
            .required_text("ip_address", "IP address", &mut errors)
            .and_then(|raw| match raw.parse::<IpAddr>() {
                Ok(ip) => Some(ip),
                Err(_) => {
                    errors.insert("ip_address", "IP address must be a valid IPv4 or IPv6 address");
                    None
                }
            });

        let cpu_cores = Self::capacity(state, "cpu_cores", "CPU cores", &mut errors);
        let ram_gb = Self::capacity(state, "ram_gb", "RAM", &mut errors);
        let disk_gb = Self::capacity(state, "disk_gb", "Disk", &mut errors);

        let cpu_usage = state.percent("cpu_usage", "CPU usage", &mut errors);
        let memory_usage = state.percent("memory_usage", "Memory usage", &mut errors);
        let disk_usage = state.percent("disk_usage", "Disk usage", &mut errors);

        let monthly_cost = state.non_negative_money("monthly_cost", "Monthly cost", &mut errors);

        let (
            Some(name),
            Some(provider),
            Some(region),
            Some(ip_address),
            Some(cpu_cores),
            Some(ram_gb),
            Some(disk_gb),
            Some(cpu_usage),
            Some(memory_usage),
            Some(disk_usage),
            Some(monthly_cost),
        ) = (
            name,
            provider,
            region,
            ip_address,
            cpu_cores,
            ram_gb,
            disk_gb,
            cpu_usage,
            memory_usage,
            disk_usage,
            monthly_cost,
        )
        else {
            return Err(errors);
        };

        errors.into_result(VpsServer {
            id: ctx.record_id,
            name,
            provider,
            ip_address,
            region,
            cpu_cores,
            ram_gb,
            disk_gb,
            cpu_usage,
            memory_usage,
            disk_usage,
            monthly_cost,
        })
    }

    fn fill(server: &VpsServer) -> FormState {
        FormState::new()
            .with("name", server.name.clone())
            .with("provider", server.provider.clone())
            .with("region", server.region.clone())
            .with("ip_address", server.ip_address.to_string())
            .with("cpu_cores", server.cpu_cores.to_string())
            .with("ram_gb", server.ram_gb.to_string())
            .with("disk_gb", server.disk_gb.to_string())
            .with("cpu_usage", server.cpu_usage.to_string())
            .with("memory_usage", server.memory_usage.to_string())
            .with("disk_usage", server.disk_usage.to_string())
            .with("monthly_cost", server.monthly_cost.to_string())
    }
}
