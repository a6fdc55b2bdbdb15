#![deny(warnings)]

//! Period-by-period runtime for the feedback simulation.
//!
//! [`step`] is the pure state transition; [`SimulationEngine`] owns the
//! carried state and the growing [`History`]; [`run`] drives a whole run.

use serde::{Deserialize, Serialize};
use sim_core::{
    validate_parameters, History, Parameters, PeriodRecord, SimulationState, ValidationError,
};
use sim_econ::{PriceAdjustment, ReinvestmentBranch};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a run. A failed run yields no history.
#[derive(Debug, Error, PartialEq)]
pub enum RunError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[from] ValidationError),
    /// Arithmetic overflowed or produced NaN.
    #[error("non-finite {field} in period {period}")]
    NonFinite { period: u32, field: &'static str },
}

/// Advance one period.
///
/// `prior` is the record of period `period - 1`, or `None` for period 0.
/// Returns the record for this period and the state carried into the next.
pub fn step(
    period: u32,
    params: &Parameters,
    state: &SimulationState,
    prior: Option<&PeriodRecord>,
) -> (PeriodRecord, SimulationState) {
    let branch = ReinvestmentBranch::select(prior.map(|r| r.revenue), params.threshold_revenue);
    let ratio = branch.ratio();

    let (energy_budget, material_budget) = sim_econ::split_investable(state.budget, ratio);
    let (energy_input, material_input) = sim_econ::physical_inputs(
        energy_budget,
        material_budget,
        params.energy_cost,
        params.material_cost,
    );
    let production =
        sim_econ::bottleneck_production(energy_input, material_input, params.production_efficiency);

    let adjustment = sim_econ::price_adjustment(prior.map(|r| r.sales), state.demand);
    let price = sim_econ::adjust_price(state.price_per_unit, adjustment);

    let sales = sim_econ::sales(production, state.demand);
    let revenue = sim_econ::revenue(sales, price);
    let budget_next =
        sim_econ::next_budget(state.budget, ratio, revenue, params.min_budget_to_operate);

    debug!(
        period,
        ?branch,
        ?adjustment,
        production,
        sales,
        revenue,
        budget_next,
        "period complete"
    );

    let record = PeriodRecord {
        time: period,
        budget: state.budget,
        price_per_unit: state.price_per_unit,
        energy_input,
        material_input,
        production,
        sales,
        revenue,
    };
    let next = SimulationState {
        budget: budget_next,
        price_per_unit: price,
        demand: state.demand,
    };
    (record, next)
}

fn check_finite(record: &PeriodRecord, next: &SimulationState) -> Result<(), RunError> {
    let fields = [
        ("energy_input", record.energy_input),
        ("material_input", record.material_input),
        ("production", record.production),
        ("sales", record.sales),
        ("revenue", record.revenue),
        ("budget", next.budget),
        ("price_per_unit", next.price_per_unit),
    ];
    match fields.into_iter().find(|(_, v)| !v.is_finite()) {
        Some((field, _)) => Err(RunError::NonFinite {
            period: record.time,
            field,
        }),
        None => Ok(()),
    }
}

/// Owns the evolving state and history of one run.
#[derive(Clone, Debug)]
pub struct SimulationEngine {
    params: Parameters,
    state: SimulationState,
    history: History,
}

impl SimulationEngine {
    /// Create an engine positioned at the start of period 0.
    pub fn new(params: Parameters) -> Result<Self, RunError> {
        validate_parameters(&params)?;
        let state = params.initial_state();
        let history = History::with_capacity(params.time_steps as usize);
        Ok(Self {
            params,
            state,
            history,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    /// State carried into the next period (after the last recorded one).
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.history.len() >= self.params.time_steps as usize
    }

    /// Advance one period. Returns `Ok(None)` once all periods are recorded.
    pub fn step(&mut self) -> Result<Option<&PeriodRecord>, RunError> {
        if self.is_finished() {
            return Ok(None);
        }
        let period = self.history.len() as u32;
        let (record, next) = step(period, &self.params, &self.state, self.history.last());
        check_finite(&record, &next)?;
        self.history.push(record);
        self.state = next;
        Ok(self.history.last())
    }

    /// Run every remaining period.
    pub fn run_to_end(&mut self) -> Result<&History, RunError> {
        while self.step()?.is_some() {}
        Ok(&self.history)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_history(&self.history, &self.params, &self.state)
    }

    pub fn into_history(self) -> History {
        self.history
    }
}

/// Run a full simulation. Either all `time_steps` periods complete or an
/// error is returned.
pub fn run(params: Parameters) -> Result<History, RunError> {
    info!(time_steps = params.time_steps, "starting run");
    let mut engine = SimulationEngine::new(params)?;
    engine.run_to_end()?;
    let summary = engine.summary();
    info!(
        periods = summary.periods,
        total_revenue = summary.total_revenue,
        final_budget = summary.final_budget,
        "run finished"
    );
    Ok(engine.into_history())
}

/// End-of-run KPIs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub periods: usize,
    pub total_production: f64,
    pub total_sales: f64,
    pub total_revenue: f64,
    /// Budget carried out of the last period.
    pub final_budget: f64,
    /// Price carried out of the last period.
    pub final_price: f64,
    pub austerity_periods: usize,
    pub discount_periods: usize,
    pub premium_periods: usize,
}

impl RunSummary {
    /// Summarize a history. `carried` is the state after the last period.
    pub fn from_history(
        history: &History,
        params: &Parameters,
        carried: &SimulationState,
    ) -> Self {
        let mut summary = RunSummary {
            periods: history.len(),
            total_production: 0.0,
            total_sales: 0.0,
            total_revenue: 0.0,
            final_budget: carried.budget,
            final_price: carried.price_per_unit,
            austerity_periods: 0,
            discount_periods: 0,
            premium_periods: 0,
        };
        let mut prior: Option<&PeriodRecord> = None;
        for r in history {
            summary.total_production += r.production;
            summary.total_sales += r.sales;
            summary.total_revenue += r.revenue;
            let branch =
                ReinvestmentBranch::select(prior.map(|p| p.revenue), params.threshold_revenue);
            if branch == ReinvestmentBranch::Austerity {
                summary.austerity_periods += 1;
            }
            match sim_econ::price_adjustment(prior.map(|p| p.sales), carried.demand) {
                PriceAdjustment::Discount => summary.discount_periods += 1,
                PriceAdjustment::Premium => summary.premium_periods += 1,
                PriceAdjustment::Hold => {}
            }
            prior = Some(r);
        }
        summary
    }
}
