pub mod config;
pub mod data;
pub mod error;
pub mod registry;
pub mod search;

pub use data::{Customer, CustomerId, Restaurant, RestaurantId, Review, ReviewId};
pub use error::{DomainError, Result};
pub use registry::{CustomerProp, NewReviewProps, NewReviewPropsBuilder, Registry, RestaurantProp};
