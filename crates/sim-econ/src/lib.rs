#![deny(warnings)]

//! Economic feedback rules applied once per period.
//!
//! This module provides the pure building blocks of a period:
//! - Reinvestment ratio chosen from the previous period's revenue
//! - Conversion of the invested budget into physical energy/material units
//! - Bottleneck production limited by the scarcer input
//! - Price feedback from the previous period's sales against demand
//! - Sales cap, revenue, and the floored budget carried forward

use serde::{Deserialize, Serialize};

/// Reinvestment ratio when revenue is healthy (and for period 0).
pub const HEALTHY_RATIO: f64 = 0.85;
/// Reinvestment ratio after a period whose revenue fell below the threshold.
pub const AUSTERITY_RATIO: f64 = 0.6;
/// Share of the investable budget spent on energy.
pub const ENERGY_SHARE: f64 = 0.4;
/// Share of the investable budget spent on materials.
pub const MATERIAL_SHARE: f64 = 0.6;
/// Sales strictly below this fraction of demand trigger a discount.
pub const LOW_SALES_FRACTION: f64 = 0.5;
/// Sales strictly above this fraction of demand trigger a premium.
pub const HIGH_SALES_FRACTION: f64 = 0.9;
/// Price multiplier on discount.
pub const DISCOUNT_FACTOR: f64 = 0.95;
/// Price multiplier on premium.
pub const PREMIUM_FACTOR: f64 = 1.10;

/// Which reinvestment policy a period runs under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReinvestmentBranch {
    Healthy,
    Austerity,
}

impl ReinvestmentBranch {
    /// Select the branch from the previous period's revenue.
    ///
    /// Period 0 has no prior revenue and runs healthy. The comparison is
    /// strict: revenue equal to the threshold stays healthy.
    pub fn select(prior_revenue: Option<f64>, threshold_revenue: f64) -> Self {
        match prior_revenue {
            Some(revenue) if revenue < threshold_revenue => ReinvestmentBranch::Austerity,
            _ => ReinvestmentBranch::Healthy,
        }
    }

    pub fn ratio(self) -> f64 {
        match self {
            ReinvestmentBranch::Healthy => HEALTHY_RATIO,
            ReinvestmentBranch::Austerity => AUSTERITY_RATIO,
        }
    }
}

/// Split `ratio * budget` into (energy_budget, material_budget).
pub fn split_investable(budget: f64, ratio: f64) -> (f64, f64) {
    let investable = ratio * budget;
    (ENERGY_SHARE * investable, MATERIAL_SHARE * investable)
}

/// Convert spend into physical input units: (energy_input, material_input).
///
/// Costs must be > 0; a zero cost yields an infinite input.
pub fn physical_inputs(
    energy_budget: f64,
    material_budget: f64,
    energy_cost: f64,
    material_cost: f64,
) -> (f64, f64) {
    (energy_budget / energy_cost, material_budget / material_cost)
}

/// Output is limited by the scarcer input, not the sum of both.
pub fn bottleneck_production(energy_input: f64, material_input: f64, efficiency: f64) -> f64 {
    efficiency * energy_input.min(material_input)
}

/// Price reaction to the previous period's sales.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceAdjustment {
    Discount,
    Premium,
    Hold,
}

impl PriceAdjustment {
    pub fn factor(self) -> Option<f64> {
        match self {
            PriceAdjustment::Discount => Some(DISCOUNT_FACTOR),
            PriceAdjustment::Premium => Some(PREMIUM_FACTOR),
            PriceAdjustment::Hold => None,
        }
    }
}

/// Decide the price reaction. Discount is checked before premium.
pub fn price_adjustment(prior_sales: Option<f64>, demand: f64) -> PriceAdjustment {
    match prior_sales {
        None => PriceAdjustment::Hold,
        Some(sales) if sales < LOW_SALES_FRACTION * demand => PriceAdjustment::Discount,
        Some(sales) if sales > HIGH_SALES_FRACTION * demand => PriceAdjustment::Premium,
        Some(_) => PriceAdjustment::Hold,
    }
}

/// Apply an adjustment to the carried-forward price.
pub fn adjust_price(price: f64, adjustment: PriceAdjustment) -> f64 {
    match adjustment.factor() {
        Some(f) => price * f,
        None => price,
    }
}

/// Units sold: capped by both production and demand.
pub fn sales(production: f64, demand: f64) -> f64 {
    production.min(demand)
}

pub fn revenue(sales: f64, price: f64) -> f64 {
    sales * price
}

/// Un-invested budget plus revenue, floored at `min_budget`.
pub fn next_budget(budget: f64, ratio: f64, revenue: f64, min_budget: f64) -> f64 {
    ((1.0 - ratio) * budget + revenue).max(min_budget)
}
