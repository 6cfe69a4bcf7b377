use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use postwise::config::Config;
use postwise::form::fields::{Location, MediaType, Platform};
use postwise::form::model::{FieldUpdate, FormModel};
use postwise::output::terminal;
use postwise::prediction::client::{HttpPredictionClient, PredictionBackend};
use postwise::session::machine::RequestStateMachine;
use postwise::session::state::RequestState;

/// Postwise: find the best time to publish a social media post.
///
/// Describes a post (platform, caption, audience, account) and asks the
/// prediction service for the optimal posting slot plus caption insights.
#[derive(Parser)]
#[command(name = "postwise", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict the best posting time for a post
    Predict(PredictArgs),

    /// List the allowed platform, location and media type values
    Options,

    /// Check that the prediction service is reachable
    Health,
}

#[derive(Args)]
struct PredictArgs {
    /// Post caption (hashtags supported)
    #[arg(long)]
    caption: String,

    /// Target platform (see `postwise options`)
    #[arg(long, default_value_t = Platform::default())]
    platform: Platform,

    /// Follower count
    #[arg(long)]
    followers: Option<String>,

    /// Account age in days
    #[arg(long)]
    account_age_days: Option<String>,

    /// Target audience location
    #[arg(long, default_value_t = Location::default())]
    location: Location,

    /// Attached media type
    #[arg(long, default_value_t = MediaType::default())]
    media_type: MediaType,

    /// The account is verified
    #[arg(long)]
    verified: bool,

    /// The post will be shared on several platforms
    #[arg(long)]
    cross_platform: bool,

    /// Extra field edits as name=value (e.g. --set followers=2500)
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    overrides: Vec<FieldUpdate>,

    /// Print the result as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl PredictArgs {
    /// Replay the flags as form edits, in the order a user would fill the form.
    fn into_form(self) -> (FormModel, bool) {
        let mut form = FormModel::default();
        form.update(FieldUpdate::Platform(self.platform));
        form.update(FieldUpdate::MediaType(self.media_type));
        form.update(FieldUpdate::Caption(self.caption));
        if let Some(followers) = self.followers {
            form.update(FieldUpdate::Followers(followers));
        }
        if let Some(age) = self.account_age_days {
            form.update(FieldUpdate::AccountAgeDays(age));
        }
        form.update(FieldUpdate::Location(self.location));
        form.update(FieldUpdate::Verified(self.verified));
        form.update(FieldUpdate::CrossPlatformSpread(self.cross_platform));
        for change in self.overrides {
            form.update(change);
        }
        (form, self.json)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("postwise=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict(args) => {
            let config = Config::load()?;
            config.require_api_url()?;
            let client = HttpPredictionClient::from_config(&config)?;

            let (form, json) = args.into_form();
            if !json {
                terminal::display_form(&form);
            }

            let mut session = RequestStateMachine::new();
            let state = run_prediction(&mut session, &form, &client, !json).await;

            if json {
                match state {
                    RequestState::Succeeded(result) => {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    }
                    other => terminal::display_state(other),
                }
            } else {
                terminal::display_state(state);
            }

            if let RequestState::Failed(e) = state {
                anyhow::bail!("prediction failed ({})", e.kind());
            }
        }

        Commands::Options => {
            println!("{}", "Allowed values:".bold());
            terminal::display_options();
        }

        Commands::Health => {
            let config = Config::load()?;
            config.require_api_url()?;
            let client = HttpPredictionClient::from_config(&config)?;

            info!(url = %config.api_url, "Checking prediction service");
            let health = client.health().await?;
            println!(
                "{} {} ({})",
                "Backend:".bold(),
                health.status.green(),
                config.api_url
            );
            if !health.message.is_empty() {
                println!("  {}", health.message.dimmed());
            }
        }
    }

    Ok(())
}

/// Drive one submit through the session, with a spinner while it's in flight.
async fn run_prediction<'a>(
    session: &'a mut RequestStateMachine,
    form: &FormModel,
    backend: &dyn PredictionBackend,
    show_spinner: bool,
) -> &'a RequestState {
    let Some(pending) = session.begin(form) else {
        return session.state();
    };

    let spinner = if show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {msg}")
                .expect("valid template"),
        );
        pb.set_message("Analyzing...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let outcome = backend.predict(&pending.payload).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    session.complete(pending.request_id, outcome);
    session.state()
}
