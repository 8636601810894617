use serde::{Deserialize, Serialize};

use opsdesk_core::{Entity, FieldErrors, FormContext, FormSchema, FormState, Money, Record, RecordId};

/// A currency the books can be shown in.
///
/// `exchange_rate` is units of this currency per one unit of the base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
    pub is_base: bool,
}

impl Currency {
    pub fn convert_to_base(&self, amount: Money) -> Money {
        Money::from_major_f64(amount.as_major() / self.exchange_rate)
    }

    pub fn convert_from_base(&self, amount: Money) -> Money {
        Money::from_major_f64(amount.as_major() * self.exchange_rate)
    }

    /// Convert an amount in this currency into `target`, via the base currency.
    pub fn convert(&self, amount: Money, target: &Currency) -> Money {
        if self.code == target.code {
            return amount;
        }
        Money::from_major_f64(amount.as_major() / self.exchange_rate * target.exchange_rate)
    }

    /// `€1,234.50`
    pub fn format(&self, amount: Money) -> String {
        if amount.is_negative() {
            format!("-{}{}", self.symbol, -amount)
        } else {
            format!("{}{}", self.symbol, amount)
        }
    }
}

impl Entity for Currency {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Record for Currency {
    const KIND: &'static str = "currencies";

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyForm;

impl FormSchema for CurrencyForm {
    type Record = Currency;
    const TITLE: &'static str = "Add Currency";

    fn build(state: &FormState, ctx: &FormContext) -> Result<Currency, FieldErrors> {
        let mut errors = FieldErrors::new();

        let code = state
            .required_text("code", "Currency code", &mut errors)
            .and_then(|code| {
                if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                    Some(code.to_ascii_uppercase())
                } else {
                    errors.insert("code", "Currency code must be 3 letters (ISO 4217)");
                    None
                }
            });
        let name = state.required_text("name", "Currency name", &mut errors);
        let symbol = state.required_text("symbol", "Symbol", &mut errors);
        let is_base = state.flag("is_base");

        let exchange_rate = if is_base {
            Some(1.0)
        } else {
            state
                .required_text("exchange_rate", "Exchange rate", &mut errors)
                .and_then(|raw| match raw.parse::<f64>() {
                    Ok(rate) if rate.is_finite() && rate > 0.0 => Some(rate),
                    _ => {
                        errors.insert("exchange_rate", "Exchange rate must be a number greater than 0");
                        None
                    }
                })
        };

        let (Some(code), Some(name), Some(symbol), Some(exchange_rate)) = (code, name, symbol, exchange_rate) else {
            return Err(errors);
        };

        errors.into_result(Currency {
            id: ctx.record_id,
            code,
            name,
            symbol,
            exchange_rate,
            is_base,
        })
    }

    fn fill(currency: &Currency) -> FormState {
        FormState::new()
            .with("code", currency.code.clone())
            .with("name", currency.name.clone())
            .with("symbol", currency.symbol.clone())
            .with("exchange_rate", currency.exchange_rate.to_string())
            .with("is_base", currency.is_base.to_string())
    }
}
