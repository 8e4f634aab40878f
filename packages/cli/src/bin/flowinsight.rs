use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;

mod cli;

use flowinsight_cli::App;
use flowinsight_client::{user_message, ApiError, Timeframe};
use flowinsight_config::Config;

#[derive(Parser)]
#[command(name = "flowinsight")]
#[command(about = "FlowInsight CLI - workflow efficiency dashboard")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in through the browser
    Login,
    /// Finish sign-in with the code from the provider redirect
    Callback {
        /// Authorization code
        code: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show session and backend status
    Status,
    /// Show the full dashboard
    Dashboard,
    /// Recompute analytics and show the new efficiency metric
    Refresh,
    /// Export the workflow audit report as JSON
    Export {
        /// Output file (defaults to workflow-audit-YYYY-MM-DD.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Mark a quick win as completed
    Complete {
        /// Quick win ID
        id: String,
    },
    /// List connected integrations
    Integrations,
    /// Show per-platform usage analytics
    Usage {
        /// last7days, last30days or last90days
        #[arg(long, default_value_t = Timeframe::default())]
        timeframe: Timeframe,
    },
    /// Show the recent activity feed
    Activity,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    flowinsight_cli::init_tracing();

    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(_) => {}
        Err(e) => {
            let message = match e.downcast_ref::<ApiError>() {
                Some(api_error) => user_message(api_error).to_string(),
                None => format!("{:#}", e),
            };
            eprintln!("{} {}", "Error:".red().bold(), message);
            process::exit(1);
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let app = App::init(config).await?;

    let result = handle_command(&app, command).await;
    app.shutdown();
    result
}

async fn handle_command(app: &App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login => cli::session::login(app),
        Commands::Callback { code } => cli::session::callback(app, &code).await,
        Commands::Logout => cli::session::logout(app).await,
        Commands::Status => cli::session::status(app),
        Commands::Dashboard => cli::insights::dashboard(app).await,
        Commands::Refresh => cli::insights::refresh(app).await,
        Commands::Export { output } => cli::insights::export(app, output).await,
        Commands::Complete { id } => cli::insights::complete(app, &id).await,
        Commands::Integrations => cli::insights::integrations(app).await,
        Commands::Usage { timeframe } => cli::insights::usage(app, timeframe).await,
        Commands::Activity => cli::insights::activity(app).await,
    }
}
