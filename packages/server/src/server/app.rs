//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    admin, analytics, auth, chat, forms, health, portfolio, social, stocks, waitlist,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
}

#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Per-IP limit via tower_governor. Needs connect info from `axum::serve`.
    pub rate_limit_enabled: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            rate_limit_enabled: true,
        }
    }
}

/// Build the Axum application router
pub fn build_app(server_deps: ServerDeps, options: AppOptions) -> Router {
    let jwt_service = server_deps.jwt_service.clone();
    let state = AppState {
        deps: Arc::new(server_deps),
    };

    // CORS configuration - the web client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let api = Router::new()
        .route("/ping", get(health::ping_handler))
        .route("/health", get(health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/waitlist", post(waitlist::join_handler))
        .route("/portfolio/optimize", post(portfolio::optimize_handler))
        .route("/portfolio/simulate", post(portfolio::simulate_handler))
        .route("/stocks/prices", get(stocks::prices_handler))
        .route("/stocks/swipe", post(stocks::swipe_handler))
        .route("/stocks/:symbol", get(stocks::detail_handler))
        .route("/social/follow", post(social::follow_handler))
        .route("/social/unfollow", post(social::unfollow_handler))
        .route("/chat", post(chat::chat_handler))
        .route("/analytics/track", post(analytics::track_handler))
        .route("/contact", post(forms::contact_handler))
        .route("/jobs/apply", post(forms::apply_handler))
        .route("/admin/login", post(admin::login_handler))
        .route("/admin/stats", get(admin::stats_handler))
        .route("/admin/waitlist", get(admin::waitlist_handler))
        .route("/admin/contacts", get(admin::contacts_handler))
        .route("/admin/contacts/:id", patch(admin::update_contact_handler))
        .route("/admin/applications", get(admin::applications_handler))
        .route(
            "/admin/applications/:id",
            patch(admin::update_application_handler),
        )
        .route("/admin/analytics", get(admin::analytics_handler))
        .route("/admin/sync-sheets", post(admin::sync_sheets_handler));

    let mut router = Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(state));

    if options.rate_limit_enabled {
        // One token back every 100ms (10/s per IP), bursts up to 20
        match GovernorConfigBuilder::default()
            .per_millisecond(100)
            .burst_size(20)
            .use_headers()
            .finish()
        {
            Some(config) => {
                router = router.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("invalid rate limit configuration, rate limiting disabled"),
        }
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
