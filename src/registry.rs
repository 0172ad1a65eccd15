use std::sync::atomic::{AtomicU64, Ordering};

use derive_builder::Builder;
use serde::Serialize;
use serde_json::Value;

use crate::data::{Customer, CustomerId, Restaurant, RestaurantId, Review, ReviewId};
use crate::error::{DomainError, Result};

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Owns every customer, restaurant and review created during a session.
/// Private review lists on customers and restaurants are copies of entries
/// in `reviews`, so nothing is ever reachable that the registry does not hold.
#[derive(Debug, Serialize)]
pub struct Registry {
    #[serde(skip)]
    id: u64,
    customers: Vec<Customer>,
    restaurants: Vec<Restaurant>,
    reviews: Vec<Review>,
}

#[derive(Clone, Debug)]
pub enum CustomerProp {
    Id(CustomerId),
    /// Full name, resolved to the first customer carrying it.
    Name(String),
}

#[derive(Clone, Debug)]
pub enum RestaurantProp {
    Id(RestaurantId),
    Name(String),
}

#[derive(Builder, Debug)]
pub struct NewReviewProps {
    customer: CustomerProp,
    restaurant: RestaurantProp,
    rating: i64,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            customers: Vec::new(),
            restaurants: Vec::new(),
            reviews: Vec::new(),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(
        &mut self,
        given_name: impl Into<Value>,
        family_name: impl Into<Value>,
    ) -> Result<CustomerId> {
        let id = CustomerId::new(self.id, self.customers.len());
        let customer = Customer::new(id, given_name, family_name)?;
        tracing::debug!("registered customer {}", customer.full_name());
        self.customers.push(customer);
        Ok(id)
    }

    /// Like [`Registry::add_customer`], but a bad name is logged and the
    /// customer is registered with empty names instead.
    pub fn add_customer_or_default(
        &mut self,
        given_name: impl Into<Value>,
        family_name: impl Into<Value>,
    ) -> CustomerId {
        match self.add_customer(given_name, family_name) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("{e}");
                let id = CustomerId::new(self.id, self.customers.len());
                self.customers.push(Customer::unnamed(id));
                id
            }
        }
    }

    pub fn add_restaurant(&mut self, name: impl Into<Value>) -> Result<RestaurantId> {
        let id = RestaurantId::new(self.id, self.restaurants.len());
        let restaurant = Restaurant::new(id, name)?;
        tracing::debug!("registered restaurant {}", restaurant.name());
        self.restaurants.push(restaurant);
        Ok(id)
    }

    /// Record `rating` from `customer` for `restaurant`. The review is stored
    /// under the customer's current full name and the restaurant's name.
    pub fn add_review(
        &mut self,
        customer: CustomerId,
        restaurant: RestaurantId,
        rating: i64,
    ) -> Result<ReviewId> {
        let customer_name = self.get_customer(customer)?.full_name();
        let restaurant_name = self.get_restaurant(restaurant)?.name().to_string();

        let review = Review::new(customer_name, restaurant_name, rating);
        self.customers[customer.index].push_review(review.clone());
        self.restaurants[restaurant.index].push_review(review.clone());
        Ok(self.register(review))
    }

    /// Record a review that belongs to no registered customer or restaurant.
    /// It still counts for [`Restaurant::customers`] and the summary.
    pub fn post_review(
        &mut self,
        customer_name: impl Into<String>,
        restaurant_name: impl Into<String>,
        rating: i64,
    ) -> ReviewId {
        self.register(Review::new(customer_name, restaurant_name, rating))
    }

    pub fn submit_review(&mut self, prop: NewReviewProps) -> Result<ReviewId> {
        let NewReviewProps {
            customer,
            restaurant,
            rating,
        } = prop;

        let customer = match customer {
            CustomerProp::Id(id) => id,
            CustomerProp::Name(name) => match self.find_by_name(&name) {
                Some(found) => found.id(),
                None => {
                    return Err(DomainError::NotFound {
                        kind: "customer",
                        name,
                    })
                }
            },
        };
        let restaurant = match restaurant {
            RestaurantProp::Id(id) => id,
            RestaurantProp::Name(name) => match self.find_restaurant_by_name(&name) {
                Some(found) => found.id(),
                None => {
                    return Err(DomainError::NotFound {
                        kind: "restaurant",
                        name,
                    })
                }
            },
        };

        self.add_review(customer, restaurant, rating)
    }

    fn register(&mut self, review: Review) -> ReviewId {
        tracing::debug!("registered review {review}");
        let id = ReviewId::new(self.id, self.reviews.len());
        self.reviews.push(review);
        id
    }

    fn get_customer(&self, id: CustomerId) -> Result<&Customer> {
        self.customer(id).ok_or(DomainError::UnknownHandle {
            kind: "customer",
            index: id.index,
        })
    }

    fn get_restaurant(&self, id: RestaurantId) -> Result<&Restaurant> {
        self.restaurant(id).ok_or(DomainError::UnknownHandle {
            kind: "restaurant",
            index: id.index,
        })
    }

    // Handles issued by another registry resolve to nothing here.
    fn issued_here(&self, registry: u64) -> bool {
        registry == self.id
    }

    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.issued_here(id.registry)
            .then(|| self.customers.get(id.index))
            .flatten()
    }

    pub fn customer_mut(&mut self, id: CustomerId) -> Option<&mut Customer> {
        if !self.issued_here(id.registry) {
            return None;
        }
        self.customers.get_mut(id.index)
    }

    pub fn restaurant(&self, id: RestaurantId) -> Option<&Restaurant> {
        self.issued_here(id.registry)
            .then(|| self.restaurants.get(id.index))
            .flatten()
    }

    pub fn review(&self, id: ReviewId) -> Option<&Review> {
        self.issued_here(id.registry)
            .then(|| self.reviews.get(id.index))
            .flatten()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn find_by_name(&self, full_name: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| customer.full_name() == full_name)
    }

    pub fn find_all_by_given_name(&self, given_name: &str) -> Vec<&Customer> {
        self.customers
            .iter()
            .filter(|customer| customer.given_name() == given_name)
            .collect()
    }

    pub fn find_restaurant_by_name(&self, name: &str) -> Option<&Restaurant> {
        self.restaurants
            .iter()
            .find(|restaurant| restaurant.name() == name)
    }

    /// `All reviews: ...` with identical reviews listed once, in the order
    /// they were first registered.
    pub fn all_reviews_summary(&self) -> String {
        let rendered = self.reviews.iter().map(ToString::to_string).collect::<Vec<_>>();
        let listed = crate::data::first_seen(rendered.iter().map(String::as_str)).join(", ");
        format!("All reviews: {listed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlands_scene() -> (Registry, CustomerId, CustomerId, RestaurantId, RestaurantId) {
        let mut registry = Registry::new();
        let john = registry.add_customer("John", "Doe").unwrap();
        let jane = registry.add_customer("Jane", "Smith").unwrap();
        let highlands = registry.add_restaurant("Highlands").unwrap();
        let kilimanjaro = registry.add_restaurant("Kilimanjaro Jamia").unwrap();
        registry.add_review(john, highlands, 4).unwrap();
        registry.add_review(john, kilimanjaro, 5).unwrap();
        registry.add_review(jane, highlands, 3).unwrap();
        (registry, john, jane, highlands, kilimanjaro)
    }

    #[test]
    fn test_add_review_reaches_all_three_lists() {
        let (registry, john, _, highlands, _) = highlands_scene();

        let customer = registry.customer(john).unwrap();
        assert_eq!(customer.num_reviews(), 2);
        assert_eq!(customer.restaurants(), vec!["Highlands", "Kilimanjaro Jamia"]);

        let restaurant = registry.restaurant(highlands).unwrap();
        assert_eq!(restaurant.reviews(), vec![4, 3]);
        assert_eq!(restaurant.average_star_rating(), 3.5);

        assert_eq!(registry.reviews().len(), 3);
    }

    #[test]
    fn test_failed_constructors_register_nothing() {
        let mut registry = Registry::new();
        assert!(registry.add_restaurant(123).is_err());
        assert!(registry.add_customer("John", 7).is_err());
        assert!(registry.restaurants().is_empty());
        assert!(registry.customers().is_empty());
    }

    #[test]
    fn test_add_customer_or_default_uses_empty_names() {
        let mut registry = Registry::new();
        let id = registry.add_customer_or_default(1, "Doe");
        let customer = registry.customer(id).unwrap();
        assert_eq!(customer.given_name(), "");
        assert_eq!(customer.family_name(), "");
        assert_eq!(registry.customers().len(), 1);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let (mut other, john, ..) = highlands_scene();
        let mut registry = Registry::new();
        let restaurant = registry.add_restaurant("Azuri").unwrap();
        other.add_customer("Ed", "Sheeran").unwrap();
        let ed = other.find_by_name("Ed Sheeran").unwrap().id();

        assert_eq!(
            registry.add_review(ed, restaurant, 4),
            Err(DomainError::UnknownHandle {
                kind: "customer",
                index: 2
            })
        );
        assert!(registry.reviews().is_empty());
        assert!(other.customer(john).is_some());
    }

    #[test]
    fn test_in_range_handle_from_other_registry_is_rejected() {
        let mut first = Registry::new();
        let ed = first.add_customer("Ed", "Sheeran").unwrap();
        let azuri = first.add_restaurant("Azuri").unwrap();
        let review = first.add_review(ed, azuri, 5).unwrap();

        let mut second = Registry::new();
        let john = second.add_customer("John", "Doe").unwrap();
        let highlands = second.add_restaurant("Highlands").unwrap();

        assert_eq!(
            second.add_review(ed, highlands, 1),
            Err(DomainError::UnknownHandle {
                kind: "customer",
                index: 0
            })
        );
        assert_eq!(
            second.add_review(john, azuri, 1),
            Err(DomainError::UnknownHandle {
                kind: "restaurant",
                index: 0
            })
        );
        let prop = NewReviewPropsBuilder::default()
            .customer(CustomerProp::Id(ed))
            .restaurant(RestaurantProp::Id(azuri))
            .rating(1)
            .build()
            .unwrap();
        assert!(second.submit_review(prop).is_err());

        assert!(second.customer(ed).is_none());
        assert!(second.customer_mut(ed).is_none());
        assert!(second.restaurant(azuri).is_none());
        assert!(second.review(review).is_none());
        assert!(second.reviews().is_empty());
        assert_eq!(second.customer(john).unwrap().num_reviews(), 0);
        assert!(second.restaurant(highlands).unwrap().reviews().is_empty());

        assert_eq!(first.customer(ed).unwrap().full_name(), "Ed Sheeran");
        assert_eq!(first.review(review).unwrap().rating(), 5);
    }

    #[test]
    fn test_customers_include_free_standing_reviews() {
        let (mut registry, _, _, highlands, _) = highlands_scene();
        registry.post_review("Ed Sheeran", "Highlands", 4);
        registry.post_review("Ed Sheeran", "Highlands", 4);
        registry.post_review("Mike Posner", "Azuri", 5);

        let restaurant = registry.restaurant(highlands).unwrap();
        assert_eq!(
            restaurant.customers(&registry),
            vec!["John Doe", "Jane Smith", "Ed Sheeran"]
        );
        // free-standing reviews do not touch the private list
        assert_eq!(restaurant.reviews(), vec![4, 3]);
    }

    #[test]
    fn test_same_name_restaurants_share_customers() {
        let mut registry = Registry::new();
        let john = registry.add_customer("John", "Doe").unwrap();
        let jane = registry.add_customer("Jane", "Smith").unwrap();
        let first = registry.add_restaurant("Highlands").unwrap();
        let second = registry.add_restaurant("Highlands").unwrap();
        registry.add_review(john, first, 5).unwrap();
        registry.add_review(jane, second, 1).unwrap();

        let second = registry.restaurant(second).unwrap();
        assert_eq!(second.customers(&registry), vec!["Jane Smith", "John Doe"]);
        assert_eq!(second.reviews(), vec![1]);
    }

    #[test]
    fn test_summary_collapses_identical_reviews() {
        let mut registry = Registry::new();
        registry.post_review("John Doe", "Highlands", 3);
        registry.post_review("Ed Sheeran", "Highlands", 4);
        registry.post_review("Ed Sheeran", "Highlands", 4);
        assert_eq!(
            registry.all_reviews_summary(),
            "All reviews: John Doe for Highlands: 3 stars, Ed Sheeran for Highlands: 4 stars"
        );
    }

    #[test]
    fn test_summary_of_empty_registry() {
        assert_eq!(Registry::new().all_reviews_summary(), "All reviews: ");
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let mut registry = Registry::new();
        let first = registry.add_customer("John", "Doe").unwrap();
        registry.add_customer("John", "Doe").unwrap();
        assert_eq!(registry.find_by_name("John Doe").map(Customer::id), Some(first));
        assert!(registry.find_by_name("Nobody Here").is_none());
    }

    #[test]
    fn test_find_by_name_sees_renames() {
        let mut registry = Registry::new();
        let id = registry.add_customer("John", "Doe").unwrap();
        registry.customer_mut(id).unwrap().set_family_name("Smith").unwrap();
        assert!(registry.find_by_name("John Doe").is_none());
        assert_eq!(registry.find_by_name("John Smith").map(Customer::id), Some(id));
    }

    #[test]
    fn test_submit_review_by_name() {
        let (mut registry, _, jane, _, kilimanjaro) = highlands_scene();
        let prop = NewReviewPropsBuilder::default()
            .customer(CustomerProp::Name("Jane Smith".to_string()))
            .restaurant(RestaurantProp::Name("Kilimanjaro Jamia".to_string()))
            .rating(2)
            .build()
            .unwrap();
        let id = registry.submit_review(prop).unwrap();

        assert_eq!(
            registry.review(id),
            Some(&Review::new("Jane Smith", "Kilimanjaro Jamia", 2))
        );
        assert_eq!(registry.customer(jane).unwrap().num_reviews(), 2);
        assert_eq!(registry.restaurant(kilimanjaro).unwrap().reviews(), vec![5, 2]);
    }

    #[test]
    fn test_submit_review_unknown_name() {
        let (mut registry, john, ..) = highlands_scene();
        let prop = NewReviewPropsBuilder::default()
            .customer(CustomerProp::Id(john))
            .restaurant(RestaurantProp::Name("Azuri".to_string()))
            .rating(5)
            .build()
            .unwrap();
        assert_eq!(
            registry.submit_review(prop),
            Err(DomainError::NotFound {
                kind: "restaurant",
                name: "Azuri".to_string()
            })
        );
        assert_eq!(registry.reviews().len(), 3);
    }

    #[test]
    fn test_builder_requires_rating() {
        let built = NewReviewPropsBuilder::default()
            .customer(CustomerProp::Name("John Doe".to_string()))
            .restaurant(RestaurantProp::Name("Highlands".to_string()))
            .build();
        assert!(built.is_err());
    }
}
