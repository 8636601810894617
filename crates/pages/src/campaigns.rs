//! Marketing campaigns page.

use chrono::NaiveDate;
use serde::Serialize;

use opsdesk_core::{Money, calc};
use opsdesk_marketing::{Campaign, CampaignForm, CampaignPhase, Channel};

use crate::RecordPage;
use crate::mock::{day, id, usd};

pub type CampaignsPage = RecordPage<CampaignForm>;

pub fn mock_campaigns() -> Vec<Campaign> {
    let campaign = |n,
                    name: &str,
                    channel,
                    (budget, spent): (i64, i64),
                    (start_date, end_date): (NaiveDate, NaiveDate),
                    (leads, conversions): (u32, u32)| Campaign {
        id: id(7, n),
        name: name.to_string(),
        channel,
        budget: usd(budget),
        spent: usd(spent),
        start_date,
        end_date,
        leads,
        conversions,
    };

    vec![
        campaign(
            1,
            "Spring Product Launch",
            Channel::Email,
            (5_000, 4_200),
            (day(2024, 3, 1), day(2024, 4, 30)),
            (320, 48),
        ),
        campaign(
            2,
            "LinkedIn B2B Outreach",
            Channel::Social,
            (8_000, 8_600),
            (day(2024, 4, 1), day(2024, 6, 30)),
            (210, 35),
        ),
        campaign(
            3,
            "Google Ads - Q2",
            Channel::Search,
            (12_000, 6_500),
            (day(2024, 4, 1), day(2024, 6, 30)),
            (540, 62),
        ),
        campaign(
            4,
            "Trade Show Berlin",
            Channel::Events,
            (15_000, 0),
            (day(2024, 9, 10), day(2024, 9, 12)),
            (0, 0),
        ),
    ]
}

pub fn campaigns_page() -> CampaignsPage {
    RecordPage::new(mock_campaigns())
}

pub fn in_phase(page: &CampaignsPage, phase: CampaignPhase, today: NaiveDate) -> Vec<&Campaign> {
    page.visible_by(|c| c.phase(today) == phase)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub total: usize,
    pub running: usize,
    pub budget: Money,
    pub spent: Money,
    pub budget_utilization: f64,
    pub over_budget: usize,
    pub leads: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
}

impl CampaignSummary {
    pub fn of(campaigns: &[Campaign], today: NaiveDate) -> Self {
        let budget: Money = campaigns.iter().map(|c| c.budget).sum();
        let spent: Money = campaigns.iter().map(|c| c.spent).sum();
        let leads: u64 = campaigns.iter().map(|c| u64::from(c.leads)).sum();
        let conversions: u64 = campaigns.iter().map(|c| u64::from(c.conversions)).sum();

        Self {
            total: campaigns.len(),
            running: campaigns
                .iter()
                .filter(|c| c.phase(today) == CampaignPhase::Running)
                .count(),
            budget,
            spent,
            budget_utilization: calc::utilization_percent(spent.as_major(), budget.as_major()),
            over_budget: campaigns.iter().filter(|c| c.is_over_budget()).count(),
            leads,
            conversions,
            conversion_rate: calc::utilization_percent(conversions as f64, leads as f64),
        }
    }
}
