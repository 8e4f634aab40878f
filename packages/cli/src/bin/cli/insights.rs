// ABOUTME: Dashboard, analytics, export and quick-win commands
// ABOUTME: Fetch through the request client and render with comfy-table

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use colored::*;
use flowinsight_cli::format::{
    activity_table, integrations_table, quick_wins_table, usage_table,
};
use flowinsight_cli::App;
use flowinsight_client::{EfficiencyMetric, Timeframe};

fn require_session(app: &App) -> anyhow::Result<()> {
    if app.session().is_authenticated() {
        Ok(())
    } else {
        anyhow::bail!("Not signed in. Use 'flowinsight login' first")
    }
}

fn print_metric(metric: &EfficiencyMetric) {
    println!(
        "Efficiency score: {}",
        format!("{}%", metric.efficiency_score).green().bold()
    );
    println!("Time saved:       {:.1}h / week", metric.time_saved);
    println!("Active tools:     {}", metric.active_tools);
}

pub async fn dashboard(app: &App) -> anyhow::Result<()> {
    require_session(app)?;
    let dashboard = app.client().get_dashboard().await?;
    let now = Utc::now();

    if let Some(user) = app.session().user() {
        println!("{}", format!("📊 Welcome back, {}", user.label()).blue().bold());
        println!();
    }
    print_metric(&dashboard.efficiency_metric);

    println!();
    println!("{}", "Integrations".bold());
    if dashboard.integrations.is_empty() {
        println!("{}", "No integrations connected".dimmed());
    } else {
        println!("{}", integrations_table(&dashboard.integrations, now));
    }

    println!();
    println!("{}", "Quick wins".bold());
    if dashboard.quick_wins.is_empty() {
        println!("{}", "Nothing to suggest right now".dimmed());
    } else {
        println!("{}", quick_wins_table(&dashboard.quick_wins));
        println!(
            "{}",
            "Use 'flowinsight complete <id>' to mark one as done".dimmed()
        );
    }

    if !dashboard.usage_analytics.is_empty() {
        println!();
        println!("{}", "Usage".bold());
        println!("{}", usage_table(&dashboard.usage_analytics));
    }

    if !dashboard.recent_activity.is_empty() {
        println!();
        println!("{}", "Recent activity".bold());
        println!("{}", activity_table(&dashboard.recent_activity, now));
    }
    Ok(())
}

pub async fn refresh(app: &App) -> anyhow::Result<()> {
    require_session(app)?;
    let metric = app.client().refresh_analytics().await?;

    println!("🔄 {}", "Analytics refreshed".green());
    print_metric(&metric);
    Ok(())
}

pub async fn export(app: &App, output: Option<PathBuf>) -> anyhow::Result<()> {
    require_session(app)?;
    let report = app.client().export_report().await?;
    let path = output.unwrap_or_else(|| PathBuf::from(report.default_file_name()));

    let json = serde_json::to_string_pretty(&report)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    println!("📄 Report exported to {}", path.display().to_string().cyan());
    Ok(())
}

pub async fn complete(app: &App, id: &str) -> anyhow::Result<()> {
    require_session(app)?;
    app.client().complete_quick_win(id).await?;

    println!("✅ Quick win {} marked as completed", id.cyan());
    Ok(())
}

pub async fn integrations(app: &App) -> anyhow::Result<()> {
    require_session(app)?;
    let integrations = app.client().get_integrations().await?;

    if integrations.is_empty() {
        println!("{}", "No integrations connected".yellow());
        return Ok(());
    }

    println!("{}", integrations_table(&integrations, Utc::now()));
    let active = integrations.iter().filter(|i| i.is_active).count();
    println!(
        "Active: {} of {}",
        active.to_string().cyan(),
        integrations.len()
    );
    Ok(())
}

pub async fn usage(app: &App, timeframe: Timeframe) -> anyhow::Result<()> {
    require_session(app)?;
    let usage = app.client().get_usage_analytics(timeframe).await?;

    println!("{}", format!("Usage ({})", timeframe).bold());
    if usage.is_empty() {
        println!("{}", "No usage data for this timeframe".dimmed());
    } else {
        println!("{}", usage_table(&usage));
    }
    Ok(())
}

pub async fn activity(app: &App) -> anyhow::Result<()> {
    require_session(app)?;
    let activity = app.client().get_recent_activity().await?;

    if activity.is_empty() {
        println!("{}", "No recent activity".dimmed());
    } else {
        println!("{}", activity_table(&activity, Utc::now()));
    }
    Ok(())
}
