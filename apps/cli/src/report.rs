//! Text rendering of a finished run.

use anyhow::{anyhow, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use sim_core::{History, PeriodRecord};
use sim_runtime::RunSummary;

/// A period's report columns rounded to cents.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub time: u32,
    pub budget: Decimal,
    pub production: Decimal,
    pub sales: Decimal,
    pub revenue: Decimal,
    pub price: Decimal,
}

fn two_dp(value: f64) -> Result<Decimal> {
    // Round the exact binary value, not its shortest decimal form.
    let mut d = Decimal::from_f64_retain(value)
        .ok_or_else(|| anyhow!("{value} cannot be represented as a decimal"))?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    d.rescale(2);
    Ok(d)
}

impl ReportRow {
    pub fn from_record(r: &PeriodRecord) -> Result<Self> {
        Ok(Self {
            time: r.time,
            budget: two_dp(r.budget)?,
            production: two_dp(r.production)?,
            sales: two_dp(r.sales)?,
            revenue: two_dp(r.revenue)?,
            price: two_dp(r.price_per_unit)?,
        })
    }
}

impl std::fmt::Display for ReportRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Time {}: Budget={}, Production={}, Sales={}, Revenue={}, Price={}",
            self.time, self.budget, self.production, self.sales, self.revenue, self.price
        )
    }
}

/// One line per period.
pub fn render_table(history: &History) -> Result<String> {
    let mut out = String::new();
    for r in history {
        out.push_str(&ReportRow::from_record(r)?.to_string());
        out.push('\n');
    }
    Ok(out)
}

pub fn render_summary(s: &RunSummary) -> Result<String> {
    Ok(format!(
        "Summary | periods: {} | revenue: {} | sold: {} | final budget: {} | final price: {} | austerity: {} | discounts: {} | premiums: {}",
        s.periods,
        two_dp(s.total_revenue)?,
        two_dp(s.total_sales)?,
        two_dp(s.final_budget)?,
        two_dp(s.final_price)?,
        s.austerity_periods,
        s.discount_periods,
        s.premium_periods
    ))
}
