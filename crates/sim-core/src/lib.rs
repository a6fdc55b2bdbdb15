#![deny(warnings)]

//! Core data model and invariants for the economic feedback simulator.
//!
//! This crate defines the serializable run parameters, the state carried
//! between periods, and the append-only per-period history, together with
//! validation helpers for the documented preconditions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed parameters of a simulation run. Never mutated once the run starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Budget available at the start of period 0.
    pub initial_budget: f64,
    /// Cost of one unit of energy input (> 0).
    pub energy_cost: f64,
    /// Cost of one unit of material input (> 0).
    pub material_cost: f64,
    /// Fraction of the effective input converted to output units (> 0).
    pub production_efficiency: f64,
    /// Price per unit at the start of period 0 (> 0).
    pub initial_price_per_unit: f64,
    /// Market demand in units per period. Constant for the whole run.
    pub initial_demand: f64,
    /// Number of periods to simulate (>= 1).
    pub time_steps: u32,
    /// Revenue below this value switches the next period to austerity.
    pub threshold_revenue: f64,
    /// Floor applied to the carried-forward budget.
    pub min_budget_to_operate: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            initial_budget: 100_000.0,
            energy_cost: 10.0,
            material_cost: 5.0,
            production_efficiency: 0.5,
            initial_price_per_unit: 120.0,
            initial_demand: 1_000.0,
            time_steps: 10,
            threshold_revenue: 1_000.0,
            min_budget_to_operate: 100.0,
        }
    }
}

impl Parameters {
    /// State at the start of period 0.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState {
            budget: self.initial_budget,
            price_per_unit: self.initial_price_per_unit,
            demand: self.initial_demand,
        }
    }
}

/// Mutable state threaded from one period into the next.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Budget at the start of the period.
    pub budget: f64,
    /// Price carried forward from the last adjustment.
    pub price_per_unit: f64,
    /// Market demand; read every period, never reassigned.
    pub demand: f64,
}

/// Outcome of a single period. Budget and price are start-of-period values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub time: u32,
    pub budget: f64,
    pub price_per_unit: f64,
    pub energy_input: f64,
    pub material_input: f64,
    pub production: f64,
    pub sales: f64,
    pub revenue: f64,
}

/// Ordered, append-only sequence of period records.
///
/// `history.get(i).time == i` holds for every stored record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<PeriodRecord>,
}

/// Per-field view of a [`History`]: equal-length vectors aligned by period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySeries {
    pub time: Vec<u32>,
    pub budget: Vec<f64>,
    pub energy_input: Vec<f64>,
    pub material_input: Vec<f64>,
    pub production: Vec<f64>,
    pub sales: Vec<f64>,
    pub revenue: Vec<f64>,
    pub price_per_unit: Vec<f64>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(periods: usize) -> Self {
        Self {
            records: Vec::with_capacity(periods),
        }
    }

    /// Append the record of the next period.
    ///
    /// Panics if `record.time` is not the next period index.
    pub fn push(&mut self, record: PeriodRecord) {
        assert_eq!(
            record.time as usize,
            self.records.len(),
            "period records must be appended in time order"
        );
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, period: usize) -> Option<&PeriodRecord> {
        self.records.get(period)
    }

    pub fn last(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeriodRecord> {
        self.records.iter()
    }

    fn column<T>(&self, f: impl Fn(&PeriodRecord) -> T) -> Vec<T> {
        self.records.iter().map(f).collect()
    }

    pub fn times(&self) -> Vec<u32> {
        self.column(|r| r.time)
    }

    pub fn budgets(&self) -> Vec<f64> {
        self.column(|r| r.budget)
    }

    pub fn prices(&self) -> Vec<f64> {
        self.column(|r| r.price_per_unit)
    }

    pub fn energy_inputs(&self) -> Vec<f64> {
        self.column(|r| r.energy_input)
    }

    pub fn material_inputs(&self) -> Vec<f64> {
        self.column(|r| r.material_input)
    }

    pub fn production(&self) -> Vec<f64> {
        self.column(|r| r.production)
    }

    pub fn sales(&self) -> Vec<f64> {
        self.column(|r| r.sales)
    }

    pub fn revenue(&self) -> Vec<f64> {
        self.column(|r| r.revenue)
    }

    /// Split the history into one sequence per field.
    pub fn series(&self) -> HistorySeries {
        HistorySeries {
            time: self.times(),
            budget: self.budgets(),
            energy_input: self.energy_inputs(),
            material_input: self.material_inputs(),
            production: self.production(),
            sales: self.sales(),
            revenue: self.revenue(),
            price_per_unit: self.prices(),
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Validation errors for run parameters.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Field is NaN or infinite.
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    /// Field is used as a divisor or multiplier and must be > 0.
    #[error("{0} must be > 0")]
    NonPositive(&'static str),
    /// `time_steps` is zero.
    #[error("time_steps must be >= 1")]
    NoPeriods,
}

/// Validate the documented preconditions of a run. Values are never adjusted.
pub fn validate_parameters(p: &Parameters) -> Result<(), ValidationError> {
    let reals = [
        ("initial_budget", p.initial_budget),
        ("energy_cost", p.energy_cost),
        ("material_cost", p.material_cost),
        ("production_efficiency", p.production_efficiency),
        ("initial_price_per_unit", p.initial_price_per_unit),
        ("initial_demand", p.initial_demand),
        ("threshold_revenue", p.threshold_revenue),
        ("min_budget_to_operate", p.min_budget_to_operate),
    ];
    for (name, value) in reals {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite(name));
        }
    }
    for (name, value) in [
        ("energy_cost", p.energy_cost),
        ("material_cost", p.material_cost),
        ("production_efficiency", p.production_efficiency),
        ("initial_price_per_unit", p.initial_price_per_unit),
    ] {
        if value <= 0.0 {
            return Err(ValidationError::NonPositive(name));
        }
    }
    if p.time_steps == 0 {
        return Err(ValidationError::NoPeriods);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(time: u32, budget: f64) -> PeriodRecord {
        PeriodRecord {
            time,
            budget,
            price_per_unit: 120.0,
            energy_input: 10.0,
            material_input: 20.0,
            production: 5.0,
            sales: 5.0,
            revenue: 600.0,
        }
    }

    #[test]
    fn defaults_are_valid() {
        let p = Parameters::default();
        validate_parameters(&p).unwrap();
        assert_eq!(p.time_steps, 10);
        let s = p.initial_state();
        assert_eq!(s.budget, 100_000.0);
        assert_eq!(s.price_per_unit, 120.0);
        assert_eq!(s.demand, 1_000.0);
    }

    #[test]
    fn zero_cost_rejected() {
        let p = Parameters {
            energy_cost: 0.0,
            ..Parameters::default()
        };
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::NonPositive("energy_cost"))
        );
    }

    #[test]
    fn zero_periods_rejected() {
        let p = Parameters {
            time_steps: 0,
            ..Parameters::default()
        };
        assert_eq!(validate_parameters(&p), Err(ValidationError::NoPeriods));
    }

    #[test]
    fn nan_rejected_before_sign_checks() {
        let p = Parameters {
            material_cost: f64::NAN,
            ..Parameters::default()
        };
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::NonFinite("material_cost"))
        );
    }

    #[test]
    fn negative_thresholds_and_floor_are_accepted() {
        let p = Parameters {
            initial_budget: -50.0,
            initial_demand: -5.0,
            threshold_revenue: -1.0,
            min_budget_to_operate: -1.0,
            ..Parameters::default()
        };
        assert_eq!(validate_parameters(&p), Ok(()));
    }

    #[test]
    #[should_panic(expected = "time order")]
    fn out_of_order_record_panics() {
        let mut h = History::new();
        h.push(record(1, 100.0));
    }

    #[test]
    fn partial_parameters_fill_defaults() {
        let p: Parameters =
            serde_json::from_str(r#"{"time_steps": 3, "energy_cost": 2.5}"#).unwrap();
        assert_eq!(p.time_steps, 3);
        assert_eq!(p.energy_cost, 2.5);
        assert_eq!(p.material_cost, 5.0);
    }

    #[test]
    fn series_are_aligned() {
        let mut h = History::new();
        h.push(record(0, 100.0));
        h.push(record(1, 200.0));
        let s = h.series();
        assert_eq!(s.time, vec![0, 1]);
        assert_eq!(s.budget, vec![100.0, 200.0]);
        assert_eq!(s.revenue.len(), 2);
        assert_eq!(s.price_per_unit.len(), 2);
        assert_eq!(h.last().map(|r| r.time), Some(1));
    }

    #[test]
    fn history_serializes_as_plain_list() {
        let mut h = History::new();
        h.push(record(0, 100.0));
        let s = serde_json::to_string(&h).unwrap();
        assert!(s.starts_with('['));
        let back: History = serde_json::from_str(&s).unwrap();
        assert_eq!(back, h);
    }

    proptest! {
        #[test]
        fn positive_costs_validate(e in 0.01f64..1e6, m in 0.01f64..1e6, eff in 0.01f64..10.0, steps in 1u32..500) {
            let p = Parameters {
                energy_cost: e,
                material_cost: m,
                production_efficiency: eff,
                time_steps: steps,
                ..Parameters::default()
            };
            prop_assert!(validate_parameters(&p).is_ok());
        }
    }
}
