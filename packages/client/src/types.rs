//! Response schemas for the FlowInsight backend API
//!
//! All payloads are camelCase JSON. Unrecognized enum values decode to an
//! `Unknown` variant so a new backend status never breaks a whole response.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use flowinsight_auth::User;
use serde::{Deserialize, Serialize};

/// Headline productivity numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyMetric {
    /// 0-100
    pub efficiency_score: u32,
    /// Hours saved per week
    pub time_saved: f64,
    pub active_tools: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    Active,
    Inactive,
    Error,
    Syncing,
    #[serde(other)]
    Unknown,
}

/// A connected third-party tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: String,
    pub platform: String,
    pub is_active: bool,
    #[serde(default)]
    pub last_sync_at: Option<DateTime<Utc>>,
    pub status: IntegrationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

/// Suggested low-effort improvement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickWin {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub impact: Level,
    pub effort: Level,
    #[serde(default)]
    pub estimated_time_saved: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    Optimal,
    NeedsAttention,
    Underutilized,
    #[serde(other)]
    Unknown,
}

/// Per-platform usage row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageAnalytic {
    pub user_id: String,
    pub platform: String,
    pub usage_percentage: f64,
    pub status: UsageStatus,
}

/// Entry of the recent-activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Everything the dashboard shows on load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub efficiency_metric: EfficiencyMetric,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub quick_wins: Vec<QuickWin>,
    #[serde(default)]
    pub usage_analytics: Vec<UsageAnalytic>,
    #[serde(default)]
    pub recent_activity: Vec<Activity>,
}

/// Exported workflow audit report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub metrics: EfficiencyMetric,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub quick_wins: Vec<QuickWin>,
    #[serde(default)]
    pub usage_analytics: Vec<UsageAnalytic>,
}

impl Report {
    /// `workflow-audit-YYYY-MM-DD.json`, dated by the report timestamp
    pub fn default_file_name(&self) -> String {
        format!("workflow-audit-{}.json", self.timestamp.format("%Y-%m-%d"))
    }
}

/// Window for usage analytics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "last7days")]
    Last7Days,
    #[default]
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "last90days")]
    Last90Days,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Last7Days => "last7days",
            Timeframe::Last30Days => "last30days",
            Timeframe::Last90Days => "last90days",
        }
    }

    pub fn all() -> [Timeframe; 3] {
        [
            Timeframe::Last7Days,
            Timeframe::Last30Days,
            Timeframe::Last90Days,
        ]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Invalid timeframe '{}'. Valid values: last7days, last30days, last90days",
                    s
                )
            })
    }
}
