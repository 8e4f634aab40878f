// ABOUTME: Display helpers for dashboard output
// ABOUTME: Platform names, relative timestamps, status badges and table rendering

use chrono::{DateTime, Utc};
use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use flowinsight_client::{
    Activity, Integration, IntegrationStatus, Level, QuickWin, UsageAnalytic, UsageStatus,
};

/// Human name for a backend platform key. Unknown keys are title-cased.
pub fn platform_display_name(platform: &str) -> String {
    match platform {
        "slack" => "Slack".to_string(),
        "gmail" => "Gmail".to_string(),
        "google_drive" => "Google Drive".to_string(),
        "notion" => "Notion".to_string(),
        "asana" => "Asana".to_string(),
        other => other
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Relative age of `then` as seen from `now`. Future timestamps read as
/// "Just now".
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else {
        plural(days, "day")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

pub fn last_sync_text(last_sync_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match last_sync_at {
        Some(at) => format_time_ago(at, now),
        None => "Never synced".to_string(),
    }
}

pub fn integration_status_label(status: IntegrationStatus) -> ColoredString {
    match status {
        IntegrationStatus::Active => "Active".green(),
        IntegrationStatus::Inactive => "Inactive".dimmed(),
        IntegrationStatus::Error => "Error".red(),
        IntegrationStatus::Syncing => "Syncing".cyan(),
        IntegrationStatus::Unknown => "Unknown".yellow(),
    }
}

pub fn usage_status_label(status: UsageStatus) -> ColoredString {
    match status {
        UsageStatus::Optimal => "Optimal".green(),
        UsageStatus::NeedsAttention => "Needs attention".yellow(),
        UsageStatus::Underutilized => "Underutilized".red(),
        UsageStatus::Unknown => "Unknown".dimmed(),
    }
}

pub fn level_label(level: Level) -> &'static str {
    match level {
        Level::Low => "Low",
        Level::Medium => "Medium",
        Level::High => "High",
        Level::Unknown => "—",
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn integrations_table(integrations: &[Integration], now: DateTime<Utc>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Platform", "Status", "Last sync"]);
    for integration in integrations {
        table.add_row(vec![
            platform_display_name(&integration.platform),
            integration_status_label(integration.status).to_string(),
            last_sync_text(integration.last_sync_at, now),
        ]);
    }
    table
}

pub fn quick_wins_table(quick_wins: &[QuickWin]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Title", "Impact", "Effort", "Saves"]);
    for quick_win in quick_wins {
        table.add_row(vec![
            quick_win.id.clone(),
            quick_win.title.clone(),
            level_label(quick_win.impact).to_string(),
            level_label(quick_win.effort).to_string(),
            quick_win.estimated_time_saved.clone(),
        ]);
    }
    table
}

pub fn usage_table(usage: &[UsageAnalytic]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Platform", "Usage", "Status"]);
    for row in usage {
        table.add_row(vec![
            platform_display_name(&row.platform),
            format!("{:.0}%", row.usage_percentage),
            usage_status_label(row.status).to_string(),
        ]);
    }
    table
}

pub fn activity_table(activity: &[Activity], now: DateTime<Utc>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["When", "Activity"]);
    for entry in activity {
        table.add_row(vec![
            format_time_ago(entry.created_at, now),
            entry.description.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case("slack", "Slack")]
    #[case("gmail", "Gmail")]
    #[case("google_drive", "Google Drive")]
    #[case("notion", "Notion")]
    #[case("asana", "Asana")]
    #[case("microsoft_teams", "Microsoft Teams")]
    fn test_platform_display_name(#[case] platform: &str, #[case] expected: &str) {
        assert_eq!(platform_display_name(platform), expected);
    }

    #[rstest]
    #[case(Duration::seconds(30), "Just now")]
    #[case(Duration::minutes(1), "1 minute ago")]
    #[case(Duration::minutes(30), "30 minutes ago")]
    #[case(Duration::minutes(59), "59 minutes ago")]
    #[case(Duration::hours(2), "2 hours ago")]
    #[case(Duration::hours(23), "23 hours ago")]
    #[case(Duration::days(1), "1 day ago")]
    #[case(Duration::days(3), "3 days ago")]
    #[case(Duration::seconds(-90), "Just now")]
    fn test_format_time_ago(#[case] age: Duration, #[case] expected: &str) {
        assert_eq!(format_time_ago(now() - age, now()), expected);
    }

    #[test]
    fn test_last_sync_text_without_sync() {
        assert_eq!(last_sync_text(None, now()), "Never synced");
        assert_eq!(
            last_sync_text(Some(now() - Duration::hours(6)), now()),
            "6 hours ago"
        );
    }

    #[test]
    fn test_usage_table_rounds_percentages() {
        let usage = vec![UsageAnalytic {
            user_id: "1".to_string(),
            platform: "google_drive".to_string(),
            usage_percentage: 71.6,
            status: UsageStatus::NeedsAttention,
        }];

        let rendered = usage_table(&usage).to_string();

        assert!(rendered.contains("Google Drive"));
        assert!(rendered.contains("72%"));
    }
}
