// ABOUTME: Sign-in, sign-out and status commands
// ABOUTME: Thin wrappers over the session manager owned by the App

use colored::*;
use flowinsight_auth::RestoreOutcome;
use flowinsight_cli::App;

pub fn login(app: &App) -> anyhow::Result<()> {
    let session = app.session();

    if let Some(user) = session.user() {
        println!("✅ Already signed in as {}", user.label().cyan());
        println!("{}", "Use 'flowinsight logout' to switch accounts".dimmed());
        return Ok(());
    }

    session.begin_login();
    println!();
    println!(
        "After signing in, finish with {}",
        "flowinsight callback <code>".yellow()
    );
    Ok(())
}

pub async fn callback(app: &App, code: &str) -> anyhow::Result<()> {
    let user = app.session().complete_callback(code).await?;

    println!("✅ Welcome, {}!", user.label().cyan().bold());
    if !user.email.is_empty() {
        println!("   {}", user.email.dimmed());
    }
    Ok(())
}

pub async fn logout(app: &App) -> anyhow::Result<()> {
    if !app.session().is_authenticated() {
        println!("{}", "Not signed in".yellow());
        return Ok(());
    }

    app.session().logout().await;
    println!("👋 Signed out");
    Ok(())
}

pub fn status(app: &App) -> anyhow::Result<()> {
    let session = app.session();

    println!("{}", "FlowInsight Status".blue().bold());
    println!();
    println!("Backend:  {}", app.config().api_base_url.cyan());
    println!(
        "Session:  {}",
        app.config().session_file.display().to_string().dimmed()
    );

    match session.user() {
        Some(user) => {
            println!("Status:   {}", session.status().to_string().green());
            println!("User:     {}", user.label());
            if !user.email.is_empty() {
                println!("Email:    {}", user.email);
            }
        }
        None => {
            println!("Status:   {}", session.status().to_string().yellow());
            if *app.restore_outcome() == RestoreOutcome::Rejected {
                println!("{}", "Your saved session has expired".red());
            }
            println!("{}", "Use 'flowinsight login' to sign in".dimmed());
        }
    }
    Ok(())
}
