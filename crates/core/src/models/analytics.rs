//! Read-only analytics dashboard payloads.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_wizards: u64,
    pub published_wizards: u64,
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub sessions_this_week: u64,
    pub completion_rate: f64,
    pub average_session_time: f64,
    pub total_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardPerformance {
    pub wizard_id: EntityId,
    pub wizard_name: String,
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub abandoned_sessions: u64,
    pub completion_rate: f64,
    pub average_time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTimelinePoint {
    pub date: chrono::NaiveDate,
    pub total: u64,
    pub completed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSession {
    pub id: EntityId,
    pub wizard_name: String,
    pub user_name: String,
    pub status: String,
    pub progress: f64,
    pub started_at: Timestamp,
}
