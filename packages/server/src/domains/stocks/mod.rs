//! Static market data and swipe handling. Prices never change.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub price: f64,
    pub change: f64,
    pub volume: u64,
    pub market_cap: &'static str,
}

const fn quote(price: f64, change: f64, volume: u64, market_cap: &'static str) -> StockQuote {
    StockQuote {
        price,
        change,
        volume,
        market_cap,
    }
}

pub const STOCKS: &[(&str, StockQuote)] = &[
    ("AAPL", quote(214.46, 0.31, 52_000_000, "2.9T")),
    ("TSLA", quote(302.28, -30.28, 41_000_000, "778B")),
    ("NVDA", quote(172.79, 2.01, 35_000_000, "1.05T")),
    ("GOOGL", quote(141.52, 1.1, 28_000_000, "1.57T")),
    ("AMZN", quote(142.75, 1.8, 33_000_000, "1.48T")),
    ("MSFT", quote(414.31, 0.8, 25_000_000, "2.71T")),
    ("META", quote(315.8, -0.5, 18_000_000, "798B")),
    ("SPY", quote(445.6, 1.1, 85_000_000, "ETF")),
];

/// Case-insensitive lookup.
pub fn find_quote(symbol: &str) -> Option<(&'static str, StockQuote)> {
    let upper = symbol.to_ascii_uppercase();
    STOCKS
        .iter()
        .find(|(s, _)| *s == upper)
        .map(|(s, q)| (*s, *q))
}

pub fn all_quotes() -> BTreeMap<&'static str, StockQuote> {
    STOCKS.iter().copied().collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockDetail {
    pub symbol: &'static str,
    #[serde(flatten)]
    pub quote: StockQuote,
    pub recommendation: &'static str,
    pub target_price: f64,
    pub analyst_rating: &'static str,
    pub risk_level: &'static str,
}

pub fn stock_detail(symbol: &str) -> DomainResult<StockDetail> {
    let (symbol, quote) =
        find_quote(symbol).ok_or_else(|| DomainError::NotFound("Stock".to_string()))?;
    Ok(StockDetail {
        symbol,
        quote,
        recommendation: "BUY",
        target_price: (quote.price * 1.15 * 100.0).round() / 100.0,
        analyst_rating: "4.2/5",
        risk_level: "Medium",
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn action(&self) -> &'static str {
        match self {
            SwipeDirection::Left => "pass",
            SwipeDirection::Right => "invest",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeRecord {
    pub id: Uuid,
    pub symbol: &'static str,
    pub direction: SwipeDirection,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub action: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub symbol: &'static str,
    pub shares: u32,
    pub amount: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub swipe: SwipeRecord,
    pub portfolio_update: Option<PortfolioUpdate>,
}

const SWIPE_SHARES: u32 = 5;
const SWIPE_AMOUNT: f64 = 1000.0;

/// Right means invest: a fixed 5-share / 1000 position. Left passes.
pub fn swipe(
    symbol: &str,
    direction: SwipeDirection,
    user_id: Option<String>,
) -> DomainResult<SwipeOutcome> {
    let (symbol, quote) =
        find_quote(symbol).ok_or_else(|| DomainError::NotFound("Stock".to_string()))?;

    let portfolio_update = (direction == SwipeDirection::Right).then(|| PortfolioUpdate {
        symbol,
        shares: SWIPE_SHARES,
        amount: SWIPE_AMOUNT,
        price: quote.price,
    });

    Ok(SwipeOutcome {
        swipe: SwipeRecord {
            id: Uuid::now_v7(),
            symbol,
            direction,
            user_id,
            timestamp: Utc::now(),
            action: direction.action(),
        },
        portfolio_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(find_quote("aapl").unwrap().0, "AAPL");
        assert!(find_quote("XYZ").is_none());
        assert_eq!(all_quotes().len(), 8);
    }

    #[test]
    fn test_detail_adds_analysis() {
        let detail = stock_detail("msft").unwrap();
        assert_eq!(detail.symbol, "MSFT");
        assert_eq!(detail.target_price, 476.46);
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["price"], 414.31);
        assert_eq!(json["marketCap"], "2.71T");
        assert_eq!(json["analystRating"], "4.2/5");
    }

    #[test]
    fn test_unknown_symbol_not_found() {
        assert!(matches!(stock_detail("nope"), Err(DomainError::NotFound(_))));
        assert!(matches!(
            swipe("nope", SwipeDirection::Right, None),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn test_swipe_right_buys_left_passes() {
        let right = swipe("nvda", SwipeDirection::Right, Some("u1".into())).unwrap();
        assert_eq!(right.swipe.action, "invest");
        let update = right.portfolio_update.unwrap();
        assert_eq!(update.shares, 5);
        assert_eq!(update.amount, 1000.0);
        assert_eq!(update.price, 172.79);

        let left = swipe("NVDA", SwipeDirection::Left, None).unwrap();
        assert_eq!(left.swipe.action, "pass");
        assert!(left.portfolio_update.is_none());
    }
}
