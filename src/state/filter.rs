use crate::model::{Dataset, Place};

/// Queries shorter than this produce no search results.
pub const MIN_QUERY_CHARS: usize = 2;

const VACANT_PREFIX: &str = "vaga-";

/// Marker visibility filter, parsed from the filter `<select>` value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PointFilter {
    #[default]
    All,
    Tier(String),
    /// Places with at least one vacant office of the tier.
    VacantTier(String),
}

impl PointFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            PointFilter::All
        } else if let Some(tier) = value.strip_prefix(VACANT_PREFIX) {
            PointFilter::VacantTier(tier.to_string())
        } else {
            PointFilter::Tier(value.to_string())
        }
    }

    pub fn as_value(&self) -> String {
        match self {
            PointFilter::All => String::new(),
            PointFilter::Tier(t) => t.clone(),
            PointFilter::VacantTier(t) => format!("{VACANT_PREFIX}{t}"),
        }
    }

    pub fn label(&self) -> String {
        match self {
            PointFilter::All => "Todos".to_string(),
            PointFilter::Tier(t) => format!("{t}ª Entrância"),
            PointFilter::VacantTier(t) => format!("PJs vagas de {t}ª entrância"),
        }
    }

    pub fn matches(&self, place: &Place) -> bool {
        match self {
            PointFilter::All => true,
            PointFilter::Tier(t) => place.offices.iter().any(|o| &o.tier == t),
            PointFilter::VacantTier(t) => {
                place.offices.iter().any(|o| &o.tier == t && o.is_vacant())
            }
        }
    }
}

/// Case-insensitive substring search over place names, in name order.
pub fn search_places(dataset: &Dataset, query: &str) -> Vec<String> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    dataset
        .names()
        .filter(|name| name.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// Exact (case-insensitive) match among search results, if any.
pub fn exact_match<'a>(results: &'a [String], query: &str) -> Option<&'a String> {
    let q = query.to_lowercase();
    results.iter().find(|r| r.to_lowercase() == q)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterStats {
    pub places: usize,
    pub offices: usize,
    pub filter: PointFilter,
}

pub fn filter_stats(dataset: &Dataset, filter: &PointFilter) -> FilterStats {
    let visible = dataset.places.values().filter(|p| filter.matches(p));
    let (places, offices) = visible.fold((0, 0), |(n, o), p| (n + 1, o + p.offices.len()));
    FilterStats {
        places,
        offices,
        filter: filter.clone(),
    }
}
