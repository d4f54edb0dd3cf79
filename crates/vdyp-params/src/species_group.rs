//! Species aggregation by SP0 group

use crate::numeric::parse_float;
use crate::state::SpeciesEntry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use vdyp_tables::limits::truncate_species_total;
use vdyp_tables::{default_utilization, group_or_self, ProjectionType, UtilizationClass};

/// Species entries merged under one group code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesGroup {
    /// SP0 group code (or the species code when it has no group)
    pub group: String,
    /// Summed percent, rounded to one decimal
    pub percent: f64,
    /// Highest-percent species of the group
    pub site_species: String,
    /// Minimum DBH applied to the group
    #[serde(rename = "minimumDBHLimit")]
    pub minimum_dbh_limit: Option<UtilizationClass>,
}

impl SpeciesGroup {
    /// Percent formatted to one decimal
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.1}", self.percent)
    }
}

#[derive(Default)]
struct Accumulator {
    total: f64,
    by_species: IndexMap<String, f64>,
}

impl Accumulator {
    fn representative(&self) -> Option<String> {
        self.by_species
            .iter()
            .max_by(|(a_code, a), (b_code, b)| a.total_cmp(b).then_with(|| b_code.cmp(a_code)))
            .map(|(code, _)| code.clone())
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Merge the species slots by group code, highest percent first
///
/// Slots with a blank code or a blank/zero percent are skipped. Ties
/// resolve by group code, and within a group by species code, so the
/// result does not depend on slot order.
#[must_use]
pub fn recompute_species_groups(entries: &[SpeciesEntry], projection_type: ProjectionType) -> Vec<SpeciesGroup> {
    let mut groups: IndexMap<String, Accumulator> = IndexMap::new();

    for entry in entries {
        let Some(code) = entry.species.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
            continue;
        };
        let percent = parse_float(entry.percent.as_deref()).unwrap_or(0.0);
        if percent == 0.0 {
            continue;
        }
        let code = code.to_ascii_uppercase();
        let acc = groups.entry(group_or_self(&code)).or_default();
        acc.total += percent;
        *acc.by_species.entry(code).or_insert(0.0) += percent;
    }

    let mut result: Vec<SpeciesGroup> = groups
        .into_iter()
        .filter_map(|(group, acc)| {
            let site_species = acc.representative()?;
            Some(SpeciesGroup {
                minimum_dbh_limit: default_utilization(&group, projection_type),
                percent: round_tenth(acc.total),
                site_species,
                group,
            })
        })
        .collect();

    result.sort_by(|a, b| match b.percent.total_cmp(&a.percent) {
        Ordering::Equal => a.group.cmp(&b.group),
        other => other,
    });
    result
}

/// Sum of the slot percents, truncated and formatted to one decimal
#[must_use]
pub fn total_species_percent(entries: &[SpeciesEntry]) -> String {
    let total: f64 = entries.iter().filter_map(|e| parse_float(e.percent.as_deref())).sum();
    format!("{:.1}", truncate_species_total(total))
}
