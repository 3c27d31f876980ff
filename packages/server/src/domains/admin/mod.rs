pub mod actions;

pub use actions::{
    analytics_summary, list_applications, list_contacts, list_waitlist, resync, stats,
    AdminStats, AnalyticsSummary, ResyncReport, ADMIN_LIST_LIMIT,
};
