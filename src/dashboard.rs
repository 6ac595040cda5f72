//! One full dashboard computation for a set of filter parameters.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::data::DataContext;
use crate::output::Presenter;
use crate::pipeline::types::{
    Biometrics, ChoroplethFeature, CountryYearCount, Heatmap, LeaderboardRow, Series,
};
use crate::pipeline::{
    SortMode, biometrics, filter_results, heatmap, join_geometry, leaderboard, medal_pivot_global,
    medal_series, medals_by_country_year,
};

pub const MEDALS_TITLE: &str = "Medals by Year";
pub const WORLD_MAP_TITLE: &str = "Total Medals Count by Country";
pub const HEATMAP_TITLE: &str = "Heatmap of Athletes";
pub const LEADERBOARD_TITLE: &str = "Top 50 Athletes by Medal Count";
pub const BODY_TITLE: &str = "Height and Weight by Year";
pub const AGE_TITLE: &str = "Age by Year";

/// Country selected when none is given.
pub const DEFAULT_COUNTRY: &str = "POL";

/// User-chosen inputs for one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterParams {
    pub countries: BTreeSet<String>,
    pub include_winter: bool,
    pub sort_mode: SortMode,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            countries: BTreeSet::from([DEFAULT_COUNTRY.to_string()]),
            include_winter: true,
            sort_mode: SortMode::Total,
        }
    }
}

impl FilterParams {
    /// Builds parameters from raw country codes, upper-cased and trimmed.
    pub fn new<I, S>(countries: I, include_winter: bool, sort_mode: SortMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            countries: countries
                .into_iter()
                .map(|c| c.as_ref().trim().to_ascii_uppercase())
                .filter(|c| !c.is_empty())
                .collect(),
            include_winter,
            sort_mode,
        }
    }
}

/// Every tab's aggregates for one set of parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub params: FilterParams,
    pub medals: Vec<CountryYearCount>,
    pub series: Vec<Series>,
    pub world_map: Vec<ChoroplethFeature>,
    pub heatmap: Heatmap,
    pub leaderboard: Vec<LeaderboardRow>,
    pub biometrics: Biometrics,
}

impl Dashboard {
    /// Runs the whole pipeline from scratch.
    #[tracing::instrument(skip_all, fields(countries = ?params.countries, include_winter = params.include_winter))]
    pub fn compute(ctx: &DataContext, params: &FilterParams) -> Self {
        let view = filter_results(ctx, &params.countries, params.include_winter);

        let medals = medals_by_country_year(&view);
        let series = medal_series(&medals, &params.countries, ctx.regions());
        let world_map = join_geometry(&medal_pivot_global(ctx), ctx.geometries());

        Self {
            params: params.clone(),
            medals,
            series,
            world_map,
            heatmap: heatmap(ctx, &params.countries),
            leaderboard: leaderboard(ctx, &view, params.sort_mode),
            biometrics: biometrics(ctx, &view),
        }
    }

    /// Hands every element to the presenter, tab by tab.
    pub fn render<P: Presenter>(&self, presenter: &mut P) -> Result<()> {
        presenter.render_line_chart(MEDALS_TITLE, &self.series)?;
        presenter.render_choropleth(WORLD_MAP_TITLE, &self.world_map)?;
        presenter.render_heatmap(HEATMAP_TITLE, &self.heatmap)?;
        presenter.render_table(LEADERBOARD_TITLE, &self.leaderboard)?;
        presenter.render_table(BODY_TITLE, &self.biometrics.body)?;
        presenter.render_table(AGE_TITLE, &self.biometrics.age)?;
        Ok(())
    }
}
