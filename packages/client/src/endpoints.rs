//! Typed wrappers over [`RequestClient::execute`] for each backend endpoint

use crate::client::{RequestClient, RequestOptions};
use crate::error::ApiResult;
use crate::types::{
    Activity, Dashboard, EfficiencyMetric, Integration, Report, Timeframe, UsageAnalytic,
};

const DASHBOARD_PATH: &str = "/api/dashboard";
const ANALYTICS_REFRESH_PATH: &str = "/api/analytics/refresh";
const EXPORT_REPORT_PATH: &str = "/api/export/report";
const INTEGRATIONS_PATH: &str = "/api/integrations";
const USAGE_ANALYTICS_PATH: &str = "/api/analytics/usage";
const RECENT_ACTIVITY_PATH: &str = "/api/activity/recent";

impl RequestClient {
    pub async fn get_dashboard(&self) -> ApiResult<Dashboard> {
        self.execute(DASHBOARD_PATH, RequestOptions::get()).await
    }

    /// Ask the backend to recompute analytics; returns the fresh metric
    pub async fn refresh_analytics(&self) -> ApiResult<EfficiencyMetric> {
        self.execute(ANALYTICS_REFRESH_PATH, RequestOptions::post())
            .await
    }

    pub async fn export_report(&self) -> ApiResult<Report> {
        self.execute(EXPORT_REPORT_PATH, RequestOptions::get()).await
    }

    /// Mark a quick win as done. The acknowledgement body is passed through
    /// as-is (`Null` for an empty response).
    pub async fn complete_quick_win(&self, quick_win_id: &str) -> ApiResult<serde_json::Value> {
        let path = format!(
            "/api/quick-wins/{}/complete",
            urlencoding::encode(quick_win_id)
        );
        self.execute(&path, RequestOptions::post()).await
    }

    pub async fn get_integrations(&self) -> ApiResult<Vec<Integration>> {
        self.execute(INTEGRATIONS_PATH, RequestOptions::get()).await
    }

    pub async fn get_usage_analytics(&self, timeframe: Timeframe) -> ApiResult<Vec<UsageAnalytic>> {
        let path = format!("{}?timeframe={}", USAGE_ANALYTICS_PATH, timeframe);
        self.execute(&path, RequestOptions::get()).await
    }

    pub async fn get_recent_activity(&self) -> ApiResult<Vec<Activity>> {
        self.execute(RECENT_ACTIVITY_PATH, RequestOptions::get())
            .await
    }
}
