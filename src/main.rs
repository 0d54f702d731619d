//! pto-planner demo entry point.
//!
//! Seeds a sample team and prints the visible week's layout, statistics
//! and team summary as JSON.

use serde_json::json;
use tracing_subscriber::EnvFilter;

use pto_planner::config::PlannerConfig;
use pto_planner::domain::{SubscriptionFilter, seed};
use pto_planner::schedule::week::DAYS_PER_WEEK;
use pto_planner::service::PlannerService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = PlannerConfig::from_env()?;
    tracing::info!(week_starts_on = ?config.week_starts_on, "starting pto-planner demo");

    // Build the session around the sample data
    let reference_date = seed::sample_reference_date()?;
    let mut service = PlannerService::new(config, reference_date);
    let mut subscription = service.subscribe(SubscriptionFilter::all());
    let allowance = service.config().default_allowance_hours;
    seed::populate(service.store_mut(), allowance)?;
    tracing::info!(events = subscription.drain().len(), "sample data loaded");

    let week = service.current_week();
    let layout: Vec<_> = (0..DAYS_PER_WEEK)
        .filter_map(|i| week.day(i).map(|date| (date, service.layout_day(i))))
        .map(|(date, placements)| json!({ "date": date, "placements": placements }))
        .collect();

    let report = json!({
        "week": week,
        "title": week.title(),
        "layout": layout,
        "suggestion": service.suggest_slot(service.config().geometry.snap_minutes() * 2),
        "week_statistics": service.week_statistics(),
        "statistics": service.statistics(),
        "team_summary": service.team_summary(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
