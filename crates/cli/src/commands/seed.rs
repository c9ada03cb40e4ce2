//! Catalog seeding command.
//!
//! Inserts a handful of demo products through the same allocator and
//! store the site uses, so seeded data is indistinguishable from real
//! uploads.

use terry_store_core::NewProduct;
use terry_store_site::db::{PgProductStore, ProductStore};

use super::CommandError;

struct SeedProduct {
    title: &'static str,
    link: &'static str,
    image_url: &'static str,
    label: &'static str,
    bullets: &'static [&'static str],
}

const SEED_PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Cool Astronaut Sticker",
        link: "https://www.stickermule.com/mx/terry1921/item/astronaut",
        image_url: "https://cdn.stickermule.com/samples/astronaut.png",
        label: "sticker",
        bullets: &["Weatherproof vinyl", "Dishwasher safe", "3 inch die cut"],
    },
    SeedProduct {
        title: "Retro Wave Bumper Sticker",
        link: "https://www.stickermule.com/mx/terry1921/item/retro-wave",
        image_url: "https://cdn.stickermule.com/samples/retro-wave.png",
        label: "bumper_sticker",
        bullets: &["UV resistant", "Leaves no residue"],
    },
    SeedProduct {
        title: "Cactus Fridge Magnet",
        link: "https://www.stickermule.com/mx/terry1921/item/cactus-magnet",
        image_url: "https://cdn.stickermule.com/samples/cactus.png",
        label: "magnet",
        bullets: &["Thick flexible magnet"],
    },
    SeedProduct {
        title: "Classic Logo T-Shirt",
        link: "https://www.stickermule.com/mx/terry1921/item/logo-tee",
        image_url: "https://cdn.stickermule.com/samples/logo-tee.png",
        label: "t_shirt",
        bullets: &[],
    },
];

/// Seed the catalog with demo products.
///
/// # Errors
///
/// Returns an error when a demo product fails validation or a write fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let products = PgProductStore::new(pool);

    for seed in SEED_PRODUCTS {
        let bullets: Vec<String> = seed.bullets.iter().map(|b| (*b).to_owned()).collect();
        let new = NewProduct::parse(seed.title, seed.link, seed.image_url, seed.label, &bullets)
            .map_err(|e| CommandError::Validation(e.to_string()))?;

        let id = products.allocate_next_id().await?;
        let product = products.insert(id, &new).await?;
        tracing::info!(product_id = %product.id, title = %product.title, "Seeded product");
    }

    tracing::info!("Seeded {} products", SEED_PRODUCTS.len());
    Ok(())
}
