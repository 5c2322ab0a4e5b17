//! Valuation: attaching base and secondary values to normalized balances.

use std::collections::HashMap;

use super::observation_model::{NormalizedBalance, ValuedBalance};
use crate::rates::RateRecord;

/// Prices normalized balances against a point-in-time rate table.
///
/// `value_base = quantity * rate`; the secondary value converts through
/// the secondary currency's own rate as the cross-rate divisor. Plain
/// floating-point arithmetic, no rounding: rounding is a presentation
/// concern outside this pipeline.
pub struct ValuationEngine {
    rates: HashMap<String, f64>,
    /// USD per unit of the secondary display currency.
    secondary_rate: Option<f64>,
}

impl ValuationEngine {
    /// Builds an engine over a snapshot of the rate table.
    /// `secondary_currency_id` is the currency the secondary valuation
    /// is expressed in; without a rate for it, secondary values are
    /// `None` across the run.
    pub fn new(rates: &[RateRecord], secondary_currency_id: Option<&str>) -> Self {
        let rates: HashMap<String, f64> = rates
            .iter()
            .map(|r| (r.currency_id.clone(), r.rate))
            .collect();
        let secondary_rate = secondary_currency_id
            .and_then(|id| rates.get(id))
            .copied()
            .filter(|rate| *rate != 0.0);
        Self {
            rates,
            secondary_rate,
        }
    }

    /// Values one balance. A currency with no rate yields `None` values:
    /// the record is unvaluable, never a fabricated zero.
    pub fn value(&self, balance: NormalizedBalance) -> ValuedBalance {
        let NormalizedBalance {
            account_id,
            currency_id,
            quantity,
        } = balance;

        let value_base = self.rates.get(&currency_id).map(|rate| quantity * rate);
        let value_secondary = match (value_base, self.secondary_rate) {
            (Some(base), Some(secondary_rate)) => Some(base / secondary_rate),
            _ => None,
        };

        ValuedBalance {
            account_id,
            currency_id,
            quantity,
            value_base,
            value_secondary,
        }
    }

    /// Values a whole batch, preserving order.
    pub fn value_all(&self, balances: Vec<NormalizedBalance>) -> Vec<ValuedBalance> {
        balances.into_iter().map(|b| self.value(b)).collect()
    }
}
