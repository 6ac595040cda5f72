use std::collections::BTreeSet;

use crate::data::{DataContext, ResultRecord, Season};

/// Result rows surviving the country/season filter, borrowed from the context.
pub type ResultsView<'a> = Vec<&'a ResultRecord>;

/// Selects result rows for the given countries.
///
/// Youth-games entries are always dropped. Winter rows are kept only when
/// `include_winter` is set. An empty `countries` set yields an empty view.
#[tracing::instrument(skip_all, fields(countries = countries.len(), include_winter = include_winter))]
pub fn filter_results<'a>(
    ctx: &'a DataContext,
    countries: &BTreeSet<String>,
    include_winter: bool,
) -> ResultsView<'a> {
    let view: ResultsView<'a> = ctx
        .results()
        .iter()
        .filter(|r| !r.is_youth_event())
        .filter(|r| countries.contains(&r.country_code))
        .filter(|r| include_winter || r.season == Season::Summer)
        .collect();

    tracing::debug!(rows = view.len(), "Results filtered");
    view
}
