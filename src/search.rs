use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};

use crate::data::{Customer, Restaurant};
use crate::registry::Registry;

/// Restaurants whose name fuzzy-matches `pattern`, best match first. Equal
/// scores keep registration order.
pub fn restaurants<'a>(registry: &'a Registry, pattern: &str) -> Vec<&'a Restaurant> {
    let matcher = SkimMatcherV2::default();
    let mut scored = registry
        .restaurants()
        .iter()
        .filter_map(|restaurant| {
            matcher
                .fuzzy_match(restaurant.name(), pattern)
                .map(|score| (score, restaurant))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, restaurant)| restaurant).collect()
}

/// Same as [`restaurants`] but over customers' full names.
pub fn customers<'a>(registry: &'a Registry, pattern: &str) -> Vec<&'a Customer> {
    let matcher = SkimMatcherV2::default();
    let mut scored = registry
        .customers()
        .iter()
        .filter_map(|customer| {
            matcher
                .fuzzy_match(&customer.full_name(), pattern)
                .map(|score| (score, customer))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, customer)| customer).collect()
}
