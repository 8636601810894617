use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use opsdesk_core::calc;
use opsdesk_core::form::{ensure_after, format_date};
use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

opsdesk_core::text_enum! {
    pub enum Channel {
        Email => "email",
        Social => "social",
        Search => "search",
        Display => "display",
        Events => "events",
        Content => "content",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPhase {
    Scheduled,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: RecordId,
    pub name: String,
    pub channel: Channel,
    pub budget: Money,
    pub spent: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leads: u32,
    pub conversions: u32,
}

impl Campaign {
    pub fn budget_utilization(&self) -> f64 {
        calc::utilization_percent(self.spent.as_major(), self.budget.as_major())
    }

    /// Budget left; negative when overspent.
    pub fn remaining_budget(&self) -> Money {
        self.budget - self.spent
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }

    /// Conversions as a percentage of leads.
    pub fn conversion_rate(&self) -> f64 {
        calc::utilization_percent(f64::from(self.conversions), f64::from(self.leads))
    }

    pub fn cost_per_lead(&self) -> Option<Money> {
        (self.leads > 0).then(|| self.spent.scale(1, i64::from(self.leads)))
    }

    pub fn phase(&self, today: NaiveDate) -> CampaignPhase {
        if today < self.start_date {
            CampaignPhase::Scheduled
        } else if today > self.end_date {
            CampaignPhase::Completed
        } else {
            CampaignPhase::Running
        }
    }
}

impl Entity for Campaign {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Campaign {
    const KIND: &'static str = "campaigns";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.channel.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignForm;

impl FormSchema for CampaignForm {
    type Record = Campaign;
    const TITLE: &'static str = "New Campaign";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Campaign, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = state.required_text("name", "Campaign name", &mut errors);
        let channel = state.choice::<Channel>("channel", "Channel", None, &mut errors);
        let budget = state.positive_money("budget", "Budget", &mut errors);
        let spent = state.non_negative_money("spent", "Amount spent", &mut errors);
        let start_date = state.date("start_date", "Start date", &mut errors);
        let end_date = state.date("end_date", "End date", &mut errors);
        ensure_after(
            start_date,
            end_date,
            "end_date",
            "End date must be after start date",
            &mut errors,
        );
        let leads = state.count("leads", "Leads", Some(0), &mut errors);
        let conversions = state.count("conversions", "Conversions", Some(0), &mut errors);
        if let (Some(leads), Some(conversions)) = (leads, conversions) {
            if conversions > leads {
                errors.insert("conversions", "Conversions cannot exceed leads");
            }
        }

        let (
            Some(name),
            Some(channel),
            Some(budget),
            Some(spent),
            Some(start_date),
            Some(end_date),
            Some(leads),
            Some(conversions),
        ) = (name, channel, budget, spent, start_date, end_date, leads, conversions)
        else {
            return Err(errors);
        };

        errors.into_result(Campaign {
            id: ctx.record_id,
            name,
            channel,
            budget,
            spent,
            start_date,
            end_date,
            leads,
            conversions,
        })
    }

    fn fill(campaign: &Campaign) -> FormState {
        FormState::new()
            .with("name", campaign.name.clone())
            .with("channel", campaign.channel.as_str())
            .with("budget", campaign.budget.to_string())
            .with("spent", campaign.spent.to_string())
            .with("start_date", format_date(campaign.start_date))
            .with("end_date", format_date(campaign.end_date))
            .with("leads", campaign.leads.to_string())
            .with("conversions", campaign.conversions.to_string())
    }
}
