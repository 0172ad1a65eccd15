use anyhow::Context;
use restaurant_reviews::{search, Registry};

pub(super) fn populate() -> anyhow::Result<Registry> {
    let mut registry = Registry::new();

    let john = registry.add_customer("John", "Doe")?;
    let jane = registry.add_customer("Jane", "Smith")?;
    registry.add_customer("John", "Johnson")?;
    // the name is not a string: keep going with an unnamed customer
    registry.add_customer_or_default("Mike", 7);

    registry.post_review("John Doe", "Highlands", 3);
    registry.post_review("Mike Posner", "Azuri", 5);
    registry.post_review("Jane Doe", "Kilimanjaro Jamia", 2);
    registry.post_review("Ed Sheeran", "Highlands", 4);
    registry.post_review("Ed Sheeran", "Highlands", 4);

    let highlands = registry.add_restaurant("Highlands")?;
    let kilimanjaro = registry.add_restaurant("Kilimanjaro Jamia")?;
    if let Err(e) = registry.add_restaurant(123) {
        tracing::warn!("{e}");
    }

    registry.add_review(john, highlands, 4)?;
    registry.add_review(john, kilimanjaro, 5)?;
    registry.add_review(jane, highlands, 3)?;

    let jane = registry
        .customer_mut(jane)
        .context("customer registered above")?;
    if let Err(e) = jane.set_given_name(false) {
        tracing::warn!("{e}");
    }

    Ok(registry)
}

pub(super) fn report(registry: &Registry) -> anyhow::Result<()> {
    let john = registry
        .find_by_name("John Doe")
        .context("fail to find John Doe")?;
    let highlands = registry
        .find_restaurant_by_name("Highlands")
        .context("fail to find Highlands")?;

    println!("{}", john.given_name());
    println!("{}", john.reviews());
    println!("{:?}", highlands.reviews());
    println!("{}", highlands.average_star_rating());
    println!("{}", highlands.customers(registry).join(", "));
    println!("{}", registry.all_reviews_summary());

    let johns = registry
        .find_all_by_given_name("John")
        .into_iter()
        .map(|customer| customer.full_name())
        .collect::<Vec<_>>();
    println!("Customers named John: {}", johns.join(", "));

    let found = search::restaurants(registry, "kili")
        .into_iter()
        .fold(String::new(), |sumed, unit| format!("{sumed}\n- {}", unit.name()));
    println!("Search for \"kili\":{found}");

    let found = search::customers(registry, "jdoe")
        .into_iter()
        .fold(String::new(), |sumed, unit| {
            format!("{sumed}\n- {} ({} reviews)", unit.full_name(), unit.num_reviews())
        });
    println!("Search for \"jdoe\":{found}");

    Ok(())
}
