use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{expect_str, Result};
use crate::registry::Registry;

// Handles remember which registry issued them, so one registry never resolves
// another's handle even when the index is in range.
macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub struct $name {
            pub(crate) registry: u64,
            pub(crate) index: usize,
        }

        impl $name {
            pub(crate) fn new(registry: u64, index: usize) -> Self {
                Self { registry, index }
            }
        }
    };
}

handle!(CustomerId);
handle!(RestaurantId);
handle!(ReviewId);

/// One rating event. Customer and restaurant are referenced by name, so two
/// restaurants sharing a name can not be told apart by their reviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    customer: String,
    restaurant: String,
    rating: i64,
}

impl Review {
    pub fn new(customer: impl Into<String>, restaurant: impl Into<String>, rating: i64) -> Self {
        Self {
            customer: customer.into(),
            restaurant: restaurant.into(),
            rating,
        }
    }

    pub fn rating(&self) -> i64 {
        self.rating
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn restaurant(&self) -> &str {
        &self.restaurant
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {}: {} stars",
            self.customer, self.restaurant, self.rating
        )
    }
}

#[derive(Debug, Serialize)]
pub struct Restaurant {
    id: RestaurantId,
    name: String,
    reviews: Vec<Review>,
}

impl Restaurant {
    pub(crate) fn new(id: RestaurantId, name: impl Into<Value>) -> Result<Self> {
        let name = expect_str(name.into(), |_| "Name must be a string.".to_string())?;
        Ok(Self {
            id,
            name,
            reviews: Vec::new(),
        })
    }

    pub fn id(&self) -> RestaurantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn reviews(&self) -> Vec<i64> {
        self.reviews.iter().map(Review::rating).collect()
    }

    /// Everyone who reviewed a restaurant carrying this name, whether the
    /// review went through this restaurant or was posted free-standing.
    pub fn customers<'a>(&'a self, registry: &'a Registry) -> Vec<&'a str> {
        let named_here = |review: &&Review| review.restaurant() == self.name;
        let own = self.reviews.iter().filter(named_here);
        let global = registry.reviews().iter().filter(named_here);
        first_seen(own.chain(global).map(Review::customer))
    }

    pub fn average_star_rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: i64 = self.reviews.iter().map(Review::rating).sum();
        total as f64 / self.reviews.len() as f64
    }
}

#[derive(Debug, Serialize)]
pub struct Customer {
    id: CustomerId,
    given_name: String,
    family_name: String,
    reviews: Vec<Review>,
}

impl Customer {
    pub(crate) fn new(
        id: CustomerId,
        given_name: impl Into<Value>,
        family_name: impl Into<Value>,
    ) -> Result<Self> {
        let all_names = |_: &Value| "All names must be a string.".to_string();
        let given_name = expect_str(given_name.into(), all_names)?;
        let family_name = expect_str(family_name.into(), all_names)?;
        Ok(Self {
            id,
            given_name,
            family_name,
            reviews: Vec::new(),
        })
    }

    pub(crate) fn unnamed(id: CustomerId) -> Self {
        Self {
            id,
            given_name: String::new(),
            family_name: String::new(),
            reviews: Vec::new(),
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn given_name(&self) -> &str {
        &self.given_name
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// On a non-string value the current name is kept.
    pub fn set_given_name(&mut self, value: impl Into<Value>) -> Result<()> {
        self.given_name = expect_str(value.into(), |v| {
            format!("Failed to set {v} as first name. First name must be a string.")
        })?;
        Ok(())
    }

    pub fn set_family_name(&mut self, value: impl Into<Value>) -> Result<()> {
        self.family_name = expect_str(value.into(), |v| {
            format!("Failed to set {v} as last name. Last name must be a string.")
        })?;
        Ok(())
    }

    pub(crate) fn push_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    pub fn reviews(&self) -> String {
        let listed = self
            .reviews
            .iter()
            .map(|review| format!("{} - {} stars", review.restaurant(), review.rating()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Reviews by {}: {listed}", self.full_name())
    }

    pub fn restaurants(&self) -> Vec<&str> {
        first_seen(self.reviews.iter().map(Review::restaurant))
    }

    pub fn num_reviews(&self) -> usize {
        self.reviews.len()
    }
}

// Set semantics with a stable order: keep the first occurrence.
pub(crate) fn first_seen<'a>(items: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(*item)).collect()
}
