//! Idempotent catalog seeding for the `load-ingredients` and `load-tags` commands.

use crate::db::DbPool;
use crate::models::{NewIngredient, NewTag};
use crate::schema::{ingredients, tags};
use anyhow::{Context, Result};
use diesel::prelude::*;
use foodgram_core::parse_ingredients;
use std::fs::File;
use std::path::Path;

const INSERT_CHUNK: usize = 1000;

pub const DEFAULT_TAGS: &[(&str, &str)] = &[
    ("Breakfast", "breakfast"),
    ("Lunch", "lunch"),
    ("Dinner", "dinner"),
];

/// Counts reported after a seeding pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub created: usize,
    pub existing: usize,
}

pub fn load_ingredients(pool: &DbPool, path: &Path) -> Result<SeedSummary> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let parsed = parse_ingredients(file)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    for skipped in &parsed.skipped {
        tracing::warn!(line = skipped.line, reason = %skipped.reason, "skipping ingredient row");
    }
    if parsed.duplicates > 0 {
        tracing::info!(count = parsed.duplicates, "ignoring repeated rows in file");
    }

    let mut conn = pool.get().context("Failed to get DB connection")?;
    let mut created = 0;
    for chunk in parsed.rows.chunks(INSERT_CHUNK) {
        let rows: Vec<NewIngredient> = chunk
            .iter()
            .map(|row| NewIngredient {
                name: &row.name,
                measurement_unit: &row.measurement_unit,
            })
            .collect();

        created += diesel::insert_into(ingredients::table)
            .values(&rows)
            .on_conflict((ingredients::name, ingredients::measurement_unit))
            .do_nothing()
            .execute(&mut conn)
            .context("Failed to insert ingredients")?;
    }

    let summary = SeedSummary {
        created,
        existing: parsed.rows.len() - created,
    };
    tracing::info!(
        created = summary.created,
        existing = summary.existing,
        skipped = parsed.skipped.len(),
        "ingredients loaded"
    );
    Ok(summary)
}

pub fn load_tags(pool: &DbPool) -> Result<SeedSummary> {
    let rows: Vec<NewTag> = DEFAULT_TAGS
        .iter()
        .map(|&(name, slug)| NewTag { name, slug })
        .collect();

    let mut conn = pool.get().context("Failed to get DB connection")?;
    let created = diesel::insert_into(tags::table)
        .values(&rows)
        .on_conflict_do_nothing()
        .execute(&mut conn)
        .context("Failed to insert tags")?;

    let summary = SeedSummary {
        created,
        existing: rows.len() - created,
    };
    tracing::info!(
        created = summary.created,
        existing = summary.existing,
        "tags loaded"
    );
    Ok(summary)
}
