use chrono::{DateTime, Duration, Utc};
use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};
use crate::domains::stocks::find_quote;

pub const MIN_INVESTMENT: f64 = 100.0;
const RECOMMENDED_SYMBOLS: [&str; 5] = ["AAPL", "NVDA", "TSLA", "GOOGL", "MSFT"];
const FALLBACK_PRICE: f64 = 185.42;
const REBALANCE_AFTER_DAYS: i64 = 90;
const DIVERSIFICATION_SCORE: f64 = 8.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    /// Unknown levels fall back to moderate.
    pub fn parse_lenient(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "conservative" => RiskLevel::Conservative,
            "aggressive" => RiskLevel::Aggressive,
            _ => RiskLevel::Moderate,
        }
    }

    pub fn allocation(&self) -> Allocation {
        match self {
            RiskLevel::Conservative => Allocation::new(0.3, 0.6, 0.1),
            RiskLevel::Moderate => Allocation::new(0.6, 0.3, 0.1),
            RiskLevel::Aggressive => Allocation::new(0.8, 0.15, 0.05),
        }
    }

    pub fn risk_score(&self) -> u8 {
        match self {
            RiskLevel::Conservative => 3,
            RiskLevel::Moderate => 6,
            RiskLevel::Aggressive => 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub stocks: f64,
    pub bonds: f64,
    pub cash: f64,
}

impl Allocation {
    pub const fn new(stocks: f64, bonds: f64, cash: f64) -> Self {
        Self {
            stocks,
            bonds,
            cash,
        }
    }

    /// Annual percent: 12 for stocks, 4 for bonds, 1 for cash.
    pub fn expected_return(&self) -> f64 {
        self.stocks * 12.0 + self.bonds * 4.0 + self.cash
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub symbol: &'static str,
    pub allocation: String,
    pub amount: String,
    pub current_price: f64,
    pub expected_return: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedPortfolio {
    pub total_value: f64,
    pub expected_return: String,
    pub risk_score: u8,
    pub allocations: Allocation,
    pub recommendations: Vec<Recommendation>,
    pub rebalance_date: DateTime<Utc>,
    pub diversification_score: f64,
}

/// Look up the canned allocation for `risk_level` and spread the stock share
/// evenly over the recommended symbols.
pub fn optimize(risk_level: &str, amount: f64, rng: &mut Rng) -> DomainResult<OptimizedPortfolio> {
    if !amount.is_finite() || amount < MIN_INVESTMENT {
        return Err(DomainError::Validation(format!(
            "Investment amount must be at least {MIN_INVESTMENT}"
        )));
    }

    let level = RiskLevel::parse_lenient(risk_level);
    let allocation = level.allocation();
    let per_symbol = allocation.stocks / RECOMMENDED_SYMBOLS.len() as f64;

    let recommendations = RECOMMENDED_SYMBOLS
        .iter()
        .map(|&symbol| Recommendation {
            symbol,
            allocation: format!("{:.1}", per_symbol * 100.0),
            amount: format!("{:.2}", per_symbol * amount),
            current_price: find_quote(symbol).map_or(FALLBACK_PRICE, |(_, q)| q.price),
            expected_return: format!("{:.1}%", rng.u32(5..25) as f64),
        })
        .collect();

    Ok(OptimizedPortfolio {
        total_value: amount,
        expected_return: format!("{:.1}%", allocation.expected_return()),
        risk_score: level.risk_score(),
        allocations: allocation,
        recommendations,
        rebalance_date: Utc::now() + Duration::days(REBALANCE_AFTER_DAYS),
        diversification_score: DIVERSIFICATION_SCORE,
    })
}
