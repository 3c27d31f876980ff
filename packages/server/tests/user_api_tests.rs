//! Auth, social, market data, portfolio and chat endpoints.

mod common;

use crate::common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn register_then_login() {
    let harness = TestHarness::new();
    let (token, user_id) = harness.user_token("user@x.com").await;
    assert!(!token.is_empty());
    assert!(!user_id.is_empty());

    let again = harness
        .client
        .post(
            "/api/auth/register",
            json!({ "email": "user@x.com", "password": "password123", "name": "Dup" }),
        )
        .await;
    assert_eq!(again.status, 409);
    assert_eq!(again.body["detail"], "User already exists");

    let login = harness
        .client
        .post(
            "/api/auth/login",
            json!({ "email": "user@x.com", "password": "password123" }),
        )
        .await;
    assert_eq!(login.status, 200);
    assert_eq!(login.body["user"]["id"], user_id.as_str());
    assert!(login.body["user"].get("passwordHash").is_none());

    let wrong = harness
        .client
        .post(
            "/api/auth/login",
            json!({ "email": "user@x.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(wrong.status, 401);
    assert_eq!(wrong.body["detail"], "Invalid credentials");
}

#[tokio::test]
async fn short_password_rejected() {
    let harness = TestHarness::new();
    let response = harness
        .client
        .post(
            "/api/auth/register",
            json!({ "email": "user@x.com", "password": "short", "name": "U" }),
        )
        .await;
    assert_eq!(response.status, 422);
}

#[tokio::test]
async fn follow_requires_authentication() {
    let harness = TestHarness::new();
    let (_, target) = harness.user_token("target@x.com").await;

    let anonymous = harness
        .client
        .post("/api/social/follow", json!({ "targetUserId": target }))
        .await;
    assert_eq!(anonymous.status, 401);

    let (token, _) = harness.user_token("fan@x.com").await;
    let followed = harness
        .client
        .post_authed("/api/social/follow", json!({ "targetUserId": target }), &token)
        .await;
    assert_eq!(followed.status, 200);
    assert_eq!(followed.body["isFollowing"], true);
    assert_eq!(followed.body["followers"], 1);

    let unfollowed = harness
        .client
        .post_authed("/api/social/unfollow", json!({ "targetUserId": target }), &token)
        .await;
    assert_eq!(unfollowed.body["isFollowing"], false);
}

#[tokio::test]
async fn stock_lookup_and_swipe() {
    let harness = TestHarness::new();

    let prices = harness.client.get("/api/stocks/prices").await;
    assert_eq!(prices.status, 200);
    assert!(prices.body["data"]["NVDA"]["price"].is_number());

    let detail = harness.client.get("/api/stocks/tsla").await;
    assert_eq!(detail.status, 200);
    assert_eq!(detail.body["data"]["symbol"], "TSLA");
    assert_eq!(detail.body["data"]["recommendation"], "BUY");

    let missing = harness.client.get("/api/stocks/XYZ").await;
    assert_eq!(missing.status, 404);

    let swipe = harness
        .client
        .post("/api/stocks/swipe", json!({ "symbol": "aapl", "direction": "right" }))
        .await;
    assert_eq!(swipe.status, 200);
    assert_eq!(swipe.body["message"], "Successfully invested in AAPL");
    assert_eq!(swipe.body["portfolioUpdate"]["shares"], 5);

    let bad_direction = harness
        .client
        .post("/api/stocks/swipe", json!({ "symbol": "AAPL", "direction": "up" }))
        .await;
    assert_eq!(bad_direction.status, 422);
}

#[tokio::test]
async fn portfolio_endpoints() {
    let harness = TestHarness::new();

    let optimized = harness
        .client
        .post(
            "/api/portfolio/optimize",
            json!({ "riskLevel": "conservative", "amount": 5000 }),
        )
        .await;
    assert_eq!(optimized.status, 200);
    assert_eq!(optimized.body["data"]["riskScore"], 3);
    assert_eq!(
        optimized.body["data"]["recommendations"].as_array().unwrap().len(),
        5
    );

    let too_small = harness
        .client
        .post("/api/portfolio/optimize", json!({ "riskLevel": "moderate", "amount": 50 }))
        .await;
    assert_eq!(too_small.status, 422);

    let simulated = harness
        .client
        .post(
            "/api/portfolio/simulate",
            json!({ "allocation": { "stocks": 0.7, "bonds": 0.3 }, "mode": "random", "timeframe": 3 }),
        )
        .await;
    assert_eq!(simulated.status, 200);
    assert_eq!(simulated.body["data"]["simulation"].as_array().unwrap().len(), 4);

    let unbalanced = harness
        .client
        .post("/api/portfolio/simulate", json!({ "allocation": { "stocks": 0.5 } }))
        .await;
    assert_eq!(unbalanced.status, 422);
    assert_eq!(unbalanced.body["detail"], "Allocation must sum to 100%");
}

#[tokio::test]
async fn chat_keeps_session() {
    let harness = TestHarness::new();

    let first = harness
        .client
        .post("/api/chat", json!({ "message": "What's the expected return?" }))
        .await;
    assert_eq!(first.status, 200);
    let session_id = first.body["data"]["sessionId"].as_str().unwrap().to_string();
    assert!(first.body["data"]["response"]
        .as_str()
        .unwrap()
        .contains("expected annual return"));

    let second = harness
        .client
        .post(
            "/api/chat",
            json!({ "message": "hello", "sessionId": session_id }),
        )
        .await;
    assert_eq!(second.body["data"]["sessionId"], session_id.as_str());
}
