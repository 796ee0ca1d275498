use crate::infra::preference_service;
use clap::Args;
use preflist::config::AppConfig;
use preflist::error::AppError;
use preflist::predictor::{PreferenceList, RequestCriteria, SearchWindow};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Student's MHTCET rank
    #[arg(long)]
    pub(crate) rank: u32,
    /// Quota filter ("All" disables it)
    #[arg(long, default_value = "All")]
    pub(crate) quota: String,
    /// Category filter ("All" disables it)
    #[arg(long, default_value = "All")]
    pub(crate) category: String,
    /// Seat type filter ("All" disables it)
    #[arg(long = "seat-type", default_value = "All")]
    pub(crate) seat_type: String,
    /// Admission round (compared as text)
    #[arg(long, default_value = "1")]
    pub(crate) round: String,
    /// Drop results below this probability percentage
    #[arg(long = "min-probability", default_value_t = 0.0)]
    pub(crate) min_probability: f64,
    /// Ranks below your own to include (safe direction)
    #[arg(long)]
    pub(crate) below: Option<u32>,
    /// Ranks above your own to include (stretch direction)
    #[arg(long)]
    pub(crate) above: Option<u32>,
    /// Override the configured dataset path
    #[arg(long)]
    pub(crate) dataset: Option<PathBuf>,
    /// Emit the result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    let defaults = SearchWindow::default();
    let criteria = RequestCriteria {
        student_rank: args.rank,
        quota: args.quota,
        category: args.category,
        seat_type: args.seat_type,
        round: args.round,
        min_probability: args.min_probability,
        window: SearchWindow::new(
            args.below.unwrap_or(defaults.below),
            args.above.unwrap_or(defaults.above),
        ),
    };

    let service = preference_service(&config.dataset);
    let list = service.generate(&criteria)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&list).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    render_preference_list(&criteria, &list);
    Ok(())
}

fn render_preference_list(criteria: &RequestCriteria, list: &PreferenceList) {
    println!(
        "Preference list for rank {} (round {})",
        criteria.student_rank, criteria.round
    );

    if list.is_empty() {
        println!("No colleges found for the given criteria.");
        return;
    }

    for row in &list.rows {
        let code = row.college_code.as_deref().unwrap_or("-");
        let cutoff = row
            .cutoff_rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}. [{}] {} | {} | cutoff {} ({:.2} %ile) | {}% {}",
            row.preference,
            code,
            row.college_name,
            row.branch_name,
            cutoff,
            row.cutoff_percentile,
            row.probability,
            row.chances
        );
    }

    if let Some(stats) = list.probability_stats() {
        println!("\nProbability statistics:");
        println!("  Mean: {:.1}%", stats.mean);
        println!("  Median: {:.1}%", stats.median);
        println!("  Range: {}% - {}%", stats.min, stats.max);
    }

    let bands = list.chance_band_counts();
    println!("\nResults by probability category:");
    println!("  Very High Chance (>=85%): {}", bands.very_high);
    println!("  High Chance (70-84%): {}", bands.high);
    println!("  Good Chance (50-69%): {}", bands.good);
    println!("  Moderate Chance (30-49%): {}", bands.moderate);
    println!("  Low Chance (<30%): {}", bands.low);

    println!("\n{} colleges returned", list.rows.len());
}
