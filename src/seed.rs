use anyhow::Result;

use crate::config::Config;
use crate::db::InvoiceStore;
use crate::error::SeedGuardError;
use crate::models::Revenue;

/// Twelve months of revenue, in dollars
pub const REVENUE_SEED: [(&str, i32); 12] = [
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Refuse administrative writes unless running in development
pub fn guard(config: &Config) -> Result<(), SeedGuardError> {
    if config.is_development() {
        Ok(())
    } else {
        Err(SeedGuardError {
            environment: config.app_env.clone(),
        })
    }
}

/// Replace the revenue table with the fixed dataset, returning the row count
pub async fn seed_revenue(store: &dyn InvoiceStore) -> Result<usize> {
    let rows: Vec<Revenue> = REVENUE_SEED
        .iter()
        .map(|(month, revenue)| Revenue::new(month, *revenue))
        .collect();

    store.replace_revenue(&rows).await?;
    tracing::info!(rows = rows.len(), "Revenue table seeded");

    Ok(rows.len())
}
