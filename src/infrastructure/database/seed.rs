//! Demo catalog

use tracing::{debug, info};

use crate::domain::product::NewProduct;
use crate::domain::{DomainResult, RepositoryProvider};

/// Drinks inserted by `--seed`, priced in cents.
const DEMO_CATALOG: &[(&str, &str, i64, bool)] = &[
    ("Cafe With Milk", "Fresh espresso with steamed milk", 200, true),
    ("Green Milk", "Green tea with creamy milk", 200, false),
    ("Ginger Tea", "Hot ginger tea with honey", 100, false),
    ("Kapuchino", "Espresso topped with milk foam", 300, true),
    ("Red Tea", "Classic black tea", 100, false),
    ("Pineapple Tea", "Fruit tea with pineapple pieces", 200, false),
    ("Red Milk Tea", "Black tea with milk", 200, true),
    ("Milk Tea", "The house milk tea", 200, true),
    ("Sun Wu Kong tea", "Oolong with peach and lychee", 300, false),
    ("Cafe Milk Modern", "Cold brew with oat milk", 300, false),
];

/// Insert the demo drinks that do not exist yet. Returns how many were added.
pub async fn seed_demo_catalog(repos: &dyn RepositoryProvider) -> DomainResult<usize> {
    let mut inserted = 0;
    for (name, description, price_cents, featured) in DEMO_CATALOG {
        if repos.products().find_by_name(name).await?.is_some() {
            debug!(product = name, "Already in catalog, skipping");
            continue;
        }
        repos
            .products()
            .create(NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price_cents: *price_cents,
                featured: *featured,
                image: None,
            })
            .await?;
        inserted += 1;
    }

    info!(inserted, "Demo catalog seeded");
    Ok(inserted)
}
