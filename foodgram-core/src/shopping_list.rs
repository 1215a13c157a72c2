//! Rendering of the aggregated shopping list.
//!
//! Grouping and summing happen in the database (`GROUP BY name, unit`); this
//! module turns the grouped rows into the plain-text attachment.

use std::fmt;

use chrono::NaiveDate;

/// One grouped product: every ingredient line with the same name and unit
/// across the cart, with amounts summed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

impl fmt::Display for ShoppingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) — {}", self.name, self.measurement_unit, self.amount)
    }
}

/// A recipe in the cart, listed under the products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRecipe {
    pub name: String,
    pub author: String,
}

#[derive(Debug, Clone)]
pub struct ShoppingList {
    pub date: NaiveDate,
    pub items: Vec<ShoppingItem>,
    pub recipes: Vec<CartRecipe>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("Shopping list for {}", self.date.format("%d.%m.%Y")),
            String::new(),
            "Products:".to_string(),
        ];

        lines.extend(self.items.iter().enumerate().map(|(i, item)| {
            let display = ShoppingItem {
                name: capitalize(&item.name),
                ..item.clone()
            };
            format!("{}. {}", i + 1, display)
        }));

        lines.push(String::new());
        lines.push("Recipes:".to_string());
        lines.extend(
            self.recipes
                .iter()
                .map(|recipe| format!("• {} (author: {})", recipe.name, recipe.author)),
        );

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// Display name for a recipe author: "First Last", or the username when both
/// names are blank.
pub fn author_display_name(first_name: &str, last_name: &str, username: &str) -> String {
    let full = format!("{} {}", first_name.trim(), last_name.trim());
    let full = full.trim();
    if full.is_empty() {
        username.to_string()
    } else {
        full.to_string()
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
