use std::collections::{BTreeMap, HashMap};

use sea_orm::FromQueryResult;
use serde::Serialize;

/// How many users have favourited a given country name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct RankingEntry {
    pub country_name: String,
    pub favourite_count: i64,
}

/// Order tallies by count descending, then by name ascending (byte-wise).
///
/// Entries with a zero count are dropped.
pub fn rank_tallies(mut tallies: Vec<RankingEntry>) -> Vec<RankingEntry> {
    tallies.retain(|t| t.favourite_count > 0);
    tallies.sort_by(|a, b| {
        b.favourite_count
            .cmp(&a.favourite_count)
            .then_with(|| a.country_name.cmp(&b.country_name))
    });
    tallies
}

/// Raw per-continent sums as returned by the grouped country query.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ContinentTotals {
    pub continent_id: i32,
    pub country_count: i64,
    pub total_inhabitants: f64,
    pub total_area: f64,
    pub total_gdp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContinentSummary {
    pub country_count: i64,
    pub total_inhabitants: f64,
    pub total_area: f64,
    pub average_area: f64,
    pub total_gdp: f64,
    pub average_inhabitants: f64,
    pub average_gdp: f64,
}

impl ContinentSummary {
    /// A continent without countries summarizes to all zeros.
    pub fn from_totals(totals: Option<&ContinentTotals>) -> Self {
        match totals {
            Some(t) if t.country_count > 0 => {
                let n = t.country_count as f64;
                Self {
                    country_count: t.country_count,
                    total_inhabitants: t.total_inhabitants,
                    total_area: t.total_area,
                    average_area: t.total_area / n,
                    total_gdp: t.total_gdp,
                    average_inhabitants: t.total_inhabitants / n,
                    average_gdp: t.total_gdp / n,
                }
            }
            _ => Self::default(),
        }
    }
}

/// Summary of every `(id, alias)` continent keyed by alias, empty continents included.
pub fn summarize_totals(
    continents: impl IntoIterator<Item = (i32, String)>,
    totals: Vec<ContinentTotals>,
) -> BTreeMap<String, ContinentSummary> {
    let by_continent: HashMap<i32, ContinentTotals> =
        totals.into_iter().map(|t| (t.continent_id, t)).collect();

    continents
        .into_iter()
        .map(|(id, alias)| (alias, ContinentSummary::from_totals(by_continent.get(&id))))
        .collect()
}
