use serde::{Deserialize, Serialize};

use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Record, RecordId};

pub const MIN_API_KEY_LEN: usize = 8;

/// A connection to a third-party service (payment gateway, mailer, CRM, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub id: RecordId,
    pub name: String,
    pub provider: String,
    pub api_key: String,
    pub webhook_url: Option<String>,
    pub enabled: bool,
}

impl Integration {
    /// API key with everything but the last four characters hidden.
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.api_key.chars().collect();
        let visible = chars.len().min(4);
        let hidden = chars.len() - visible;
        let tail: String = chars[hidden..].iter().collect();
        format!("{}{}", "•".repeat(hidden), tail)
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}

impl Entity for Integration {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Integration {
    const KIND: &'static str = "integrations";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.provider.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegrationForm;

impl FormSchema for IntegrationForm {
    type Record = Integration;
    const TITLE: &'static str = "Connect Integration";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Integration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = state.required_text("name", "Integration name", &mut errors);
        let provider = state.required_text("provider", "Provider", &mut errors);
        let api_key = state
            .required_text("api_key", "API key", &mut errors)
            .and_then(|key| {
                if key.chars().count() < MIN_API_KEY_LEN {
                    errors.insert(
                        "api_key",
                        format!("API key must be at least {MIN_API_KEY_LEN} characters"),
                    );
                    None
                } else {
                    Some(key)
                }
            });

        let webhook_url = state.optional_text("webhook_url");
        if webhook_url.as_deref().is_some_and(|url| !is_https_url(url)) {
            errors.insert("webhook_url", "Webhook URL must start with https://");
        }

        let (Some(name), Some(provider), Some(api_key)) = (name, provider, api_key) else {
            return Err(errors);
        };

        errors.into_result(Integration {
            id: ctx.record_id,
            name,
            provider,
            api_key,
            webhook_url,
            enabled: state.get("enabled").is_none_or(|_| state.flag("enabled")),
        })
    }

    fn fill(integration: &Integration) -> FormState {
        let mut state = FormState::new()
            .with("name", integration.name.clone())
            .with("provider", integration.provider.clone())
            .with("api_key", integration.api_key.clone())
            .with("enabled", integration.enabled.to_string());
        if let Some(url) = &integration.webhook_url {
            state.set("webhook_url", url.clone());
        }
        state
    }
}

fn is_https_url(url: &str) -> bool {
    url.strip_prefix("https://")
        .is_some_and(|rest| !rest.is_empty() && !rest.contains(char::is_whitespace))
}
