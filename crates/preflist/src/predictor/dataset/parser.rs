use super::{CutoffRecord, UnknownRankPolicy};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(super) fn parse_records<R: Read>(
    reader: R,
    policy: UnknownRankPolicy,
) -> Result<Vec<CutoffRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    let mut unknown_ranks = 0usize;

    for row in csv_reader.deserialize::<CutoffRow>() {
        let row = row?;
        let cutoff_rank = parse_rank(&row.cutoff_rank);
        if cutoff_rank.is_none() {
            unknown_ranks += 1;
            if policy == UnknownRankPolicy::DropAtLoad {
                continue;
            }
        }

        records.push(CutoffRecord {
            college_code: row.college_code,
            college_name: row.college_name,
            branch_code: row.branch_code,
            branch_name: row.branch_name,
            category_code: row.category_code,
            quota: row.quota,
            category: row.category,
            seat_type: row.seat_type,
            round: row.round,
            cutoff_rank,
            cutoff_percentile: parse_percentile(&row.cutoff_percentile),
        });
    }

    if unknown_ranks > 0 {
        tracing::debug!(
            rows = unknown_ranks,
            ?policy,
            "rows without a parsable cutoff rank"
        );
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CutoffRow {
    #[serde(
        rename = "College code",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    college_code: Option<String>,
    #[serde(rename = "College name")]
    college_name: String,
    #[serde(
        rename = "Branch code",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    branch_code: Option<String>,
    #[serde(rename = "Branch name")]
    branch_name: String,
    #[serde(
        rename = "Category code",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    category_code: Option<String>,
    #[serde(rename = "Quota")]
    quota: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Seat Type")]
    seat_type: String,
    #[serde(rename = "Round")]
    round: String,
    #[serde(rename = "Cutoff rank", default)]
    cutoff_rank: String,
    #[serde(rename = "Cutoff percentile", default)]
    cutoff_percentile: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Lenient numeric coercion for the rank column: integer form first, then a
/// float fallback for exports that write ranks as `96487.0`.
fn parse_rank(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(rank) = trimmed.parse::<u32>() {
        return Some(rank);
    }

    match trimmed.parse::<f64>() {
        Ok(rank) if rank.is_finite() && rank >= 0.0 && rank <= f64::from(u32::MAX) => {
            Some(rank as u32)
        }
        _ => None,
    }
}

fn parse_percentile(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(0.0)
}
