//! Admin analytics endpoints.

use serde::Serialize;
use wizplat_core::models::analytics::{
    DashboardStats, RecentSession, SessionTimelinePoint, WizardPerformance,
};

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Serialize)]
struct Limit {
    limit: u32,
}

#[derive(Serialize)]
struct Days {
    days: u32,
}

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get_json("/analytics/dashboard").await
    }

    pub async fn wizard_performance(&self, limit: u32) -> Result<Vec<WizardPerformance>, ApiError> {
        self.get_json_query("/analytics/wizards/performance", &Limit { limit })
            .await
    }

    /// Daily session counts for the last `days` days.
    pub async fn session_timeline(&self, days: u32) -> Result<Vec<SessionTimelinePoint>, ApiError> {
        self.get_json_query("/analytics/sessions/timeline", &Days { days })
            .await
    }

    pub async fn recent_sessions(&self, limit: u32) -> Result<Vec<RecentSession>, ApiError> {
        self.get_json_query("/analytics/sessions/recent", &Limit { limit })
            .await
    }
}
