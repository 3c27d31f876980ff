//! Canned investment assistant.

const RESPONSES: [(&str, &str); 4] = [
    (
        "tech stock",
        "Based on current analysis, NVDA shows strong fundamentals with AI tailwinds. Your portfolio already has 28% NVDA allocation, which provides good exposure to the AI trend.",
    ),
    (
        "diversify",
        "I recommend diversifying across sectors: 30% tech (AAPL, NVDA), 25% healthcare (JNJ, PFE), 20% finance (JPM, BAC), 15% consumer goods (PG, KO), 10% bonds/cash for stability.",
    ),
    (
        "expected return",
        "With your current allocation (60% stocks, 30% bonds, 10% cash), expected annual return is 8-12%. Tech heavy weighting increases potential but adds volatility.",
    ),
    (
        "AAPL",
        "AAPL is currently trading at $214.46 (+0.14%). Strong buy signals: iOS 18 adoption, services growth, China recovery. Consider accumulating on dips below $210.",
    ),
];

pub const FALLBACK_RESPONSE: &str = "I'm here to help with investment decisions! Ask me about portfolio allocation, stock analysis, or market trends.";

/// First keyword found in `message` (case-insensitive) wins.
pub fn respond(message: &str) -> &'static str {
    let message = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keyword, _)| message.contains(&keyword.to_lowercase()))
        .map_or(FALLBACK_RESPONSE, |(_, response)| response)
}
