use std::collections::HashMap;

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

pub const INITIAL_VALUE: f64 = 10_000.0;
pub const MONTHLY_RETURN: f64 = 0.008;
pub const DEFAULT_TIMEFRAME: u32 = 12;
pub const MAX_TIMEFRAME: u32 = 600;
const ALLOCATION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    /// Compounds a constant monthly return
    #[default]
    Fixed,
    /// Monthly returns drawn uniformly from [-2%, +2%) around the mean
    Random,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedSimulation {
    pub initial_value: f64,
    pub final_value: f64,
    pub total_return: f64,
    pub timeframe: u32,
    pub allocation: HashMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPoint {
    pub month: u32,
    pub value: i64,
    #[serde(rename = "return")]
    pub cumulative_return: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomSimulation {
    pub simulation: Vec<MonthlyPoint>,
    pub final_value: f64,
    pub total_return: String,
    pub volatility: String,
    pub sharpe_ratio: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SimulationResult {
    Fixed(FixedSimulation),
    Random(RandomSimulation),
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent_gain(value: f64) -> f64 {
    (value - INITIAL_VALUE) / INITIAL_VALUE * 100.0
}

pub fn simulate(
    allocation: HashMap<String, f64>,
    timeframe: Option<u32>,
    mode: SimulationMode,
    rng: &mut Rng,
) -> DomainResult<SimulationResult> {
    let total: f64 = allocation.values().sum();
    if (total - 1.0).abs() > ALLOCATION_TOLERANCE {
        return Err(DomainError::Validation(
            "Allocation must sum to 100%".to_string(),
        ));
    }

    let timeframe = timeframe.unwrap_or(DEFAULT_TIMEFRAME);
    if timeframe == 0 || timeframe > MAX_TIMEFRAME {
        return Err(DomainError::Validation(format!(
            "timeframe must be between 1 and {MAX_TIMEFRAME} months"
        )));
    }

    let result = match mode {
        SimulationMode::Fixed => {
            let mut value = INITIAL_VALUE;
            for _ in 0..timeframe {
                value *= 1.0 + MONTHLY_RETURN;
            }
            SimulationResult::Fixed(FixedSimulation {
                initial_value: INITIAL_VALUE,
                final_value: round2(value),
                total_return: round2(percent_gain(value)),
                timeframe,
                allocation,
            })
        }
        SimulationMode::Random => {
            let mut value = INITIAL_VALUE;
            let mut points = Vec::with_capacity(timeframe as usize + 1);
            for month in 0..=timeframe {
                let monthly = (rng.i32(0..40) - 20) as f64 / 1000.0 + MONTHLY_RETURN;
                value *= 1.0 + monthly;
                points.push(MonthlyPoint {
                    month,
                    value: value.round() as i64,
                    cumulative_return: format!("{:.2}", percent_gain(value)),
                });
            }
            SimulationResult::Random(RandomSimulation {
                simulation: points,
                final_value: value,
                total_return: format!("{:.2}", percent_gain(value)),
                volatility: format!("{:.1}", rng.u32(10..25) as f64),
                sharpe_ratio: format!("{:.2}", rng.u32(0..20) as f64 / 10.0 + 0.5),
            })
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balanced() -> HashMap<String, f64> {
        HashMap::from([
            ("stocks".to_string(), 0.6),
            ("bonds".to_string(), 0.3),
            ("cash".to_string(), 0.1),
        ])
    }

    #[test]
    fn test_fixed_mode_compounds_monthly() {
        let mut rng = Rng::with_seed(1);
        let SimulationResult::Fixed(result) =
            simulate(balanced(), None, SimulationMode::Fixed, &mut rng).unwrap()
        else {
            panic!("expected fixed result");
        };
        assert_eq!(result.timeframe, 12);
        assert_eq!(result.final_value, 11003.39);
        assert_eq!(result.total_return, 10.03);
    }

    #[test]
    fn test_random_mode_has_one_point_per_month_inclusive() {
        let mut rng = Rng::with_seed(1);
        let SimulationResult::Random(result) =
            simulate(balanced(), Some(6), SimulationMode::Random, &mut rng).unwrap()
        else {
            panic!("expected random result");
        };
        assert_eq!(result.simulation.len(), 7);
        assert_eq!(result.simulation[6].month, 6);
        // Each month moves between -1.2% and +2.8%
        let low = INITIAL_VALUE * 0.988f64.powi(7);
        let high = INITIAL_VALUE * 1.028f64.powi(7);
        assert!(result.final_value >= low && result.final_value <= high);
    }

    #[test]
    fn test_allocation_must_sum_to_one() {
        let mut rng = Rng::with_seed(1);
        let lopsided = HashMap::from([("stocks".to_string(), 0.5)]);
        assert!(matches!(
            simulate(lopsided, None, SimulationMode::Fixed, &mut rng),
            Err(DomainError::Validation(_))
        ));
        let close_enough = HashMap::from([("stocks".to_string(), 0.995)]);
        assert!(simulate(close_enough, None, SimulationMode::Fixed, &mut rng).is_ok());
    }

    #[test]
    fn test_timeframe_bounds() {
        let mut rng = Rng::with_seed(1);
        assert!(simulate(balanced(), Some(0), SimulationMode::Fixed, &mut rng).is_err());
        assert!(simulate(balanced(), Some(601), SimulationMode::Fixed, &mut rng).is_err());
        assert!(simulate(balanced(), Some(600), SimulationMode::Fixed, &mut rng).is_ok());
    }
}
