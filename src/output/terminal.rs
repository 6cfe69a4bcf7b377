// Colored terminal rendering of the form and the request state.
//
// Pure projection: the render_* functions build strings from state and never
// touch it; display_* just print them. A Failed state shows only the error,
// a Succeeded state only the result.

use std::fmt::Write as _;

use chrono::Local;
use colored::Colorize;

use crate::form::fields::{Location, MediaType, Platform};
use crate::form::model::FormModel;
use crate::prediction::error::ErrorKind;
use crate::prediction::result::{PredictionResult, SentimentCategory};
use crate::session::state::RequestState;

/// Render whatever the session currently holds.
pub fn render_state(state: &RequestState) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Submitting { .. } => format!("{}", "Analyzing...".dimmed()),
        RequestState::Succeeded(result) => render_result(result),
        RequestState::Failed(error) => {
            let hint = match error.kind() {
                ErrorKind::Validation => "Fix the highlighted input and submit again.",
                ErrorKind::Network => "Please ensure the backend is running.",
                ErrorKind::Server => "The backend could not produce a prediction.",
                ErrorKind::Parse => "The backend sent an unexpected response.",
            };
            format!(
                "{} {}\n  {}",
                "!!".red().bold(),
                error.to_string().red(),
                hint.dimmed()
            )
        }
    }
}

/// Render a successful prediction: posting window, then the NLP insights.
pub fn render_result(result: &PredictionResult) -> String {
    let insights = &result.nlp_insights;
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "=== Recommended Post Time ===".bold());
    let _ = writeln!(
        out,
        "  {} @ {}:00",
        result.day_name().bold(),
        result.best_hour
    );
    let _ = writeln!(
        out,
        "  Next window: {}",
        result.next_window(&Local::now()).format("%a %Y-%m-%d %H:%M")
    );
    if let Some(engagement) = result.predicted_engagement {
        let _ = writeln!(out, "  Predicted engagement: {engagement:.2}");
    }

    let _ = writeln!(out, "\n{}", "=== AI Content Analysis ===".bold());
    let _ = writeln!(out, "  Detected topic: {}", insights.topic.blue().bold());
    let _ = writeln!(
        out,
        "  Sentiment:      {}",
        colorize_sentiment(insights.sentiment_category)
    );
    let _ = writeln!(
        out,
        "  Toxicity score: {}",
        format!("{:.1}%", insights.toxicity_score).truecolor(255, 165, 0)
    );
    let _ = writeln!(
        out,
        "  Language:       {}",
        insights.language.to_uppercase()
    );
    if let Some(hashtags) = insights.num_hashtags {
        let _ = writeln!(out, "  Hashtags:       {hashtags}");
    }

    out
}

/// One-screen summary of the form about to be submitted.
pub fn render_form(form: &FormModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} on {} ({}), audience: {}",
        form.media_type.to_string().bold(),
        form.platform.to_string().bold(),
        if form.verified { "verified" } else { "unverified" },
        form.location
    );
    let _ = writeln!(
        out,
        "  Followers: {}  Account age: {} days  Multi-platform: {}",
        form.followers,
        form.account_age_days,
        if form.cross_platform_spread { "yes" } else { "no" }
    );
    let _ = writeln!(
        out,
        "  Caption: \"{}\"",
        super::truncate_chars(&form.caption, 120).dimmed()
    );
    let tags = form.hashtags();
    if !tags.is_empty() {
        let _ = writeln!(out, "  Hashtags: #{}", tags.join(" #"));
    }
    out
}

/// Allowed values for each selection field.
pub fn render_options() -> String {
    fn line<T: ToString>(label: &str, options: &[T]) -> String {
        let joined = options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("  {:<12} {}", label.bold(), joined)
    }

    [
        line("Platform", Platform::ALL),
        line("Location", Location::ALL),
        line("Media type", MediaType::ALL),
    ]
    .join("\n")
}

pub fn display_state(state: &RequestState) {
    let rendered = render_state(state);
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}

pub fn display_form(form: &FormModel) {
    print!("{}", render_form(form));
}

pub fn display_options() {
    println!("{}", render_options());
}

fn colorize_sentiment(sentiment: SentimentCategory) -> colored::ColoredString {
    match sentiment {
        SentimentCategory::Positive => sentiment.as_str().green().bold(),
        SentimentCategory::Negative => sentiment.as_str().red().bold(),
        SentimentCategory::Neutral => sentiment.as_str().yellow().bold(),
    }
}
