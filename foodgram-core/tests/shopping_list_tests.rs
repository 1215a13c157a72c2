//! End-to-end checks over the public core API: the seed file, recipe payload
//! validation and the rendered shopping list.

use chrono::NaiveDate;
use foodgram_core::query::prefix_pattern;
use foodgram_core::{
    author_display_name, parse_ingredients, short_link, validate_recipe, CartRecipe,
    IngredientAmount, RecipeDraft, ShoppingItem, ShoppingList, WriteMode,
};
use std::fs::File;
use std::path::Path;
use uuid::Uuid;

/// Get the project root directory
fn project_root() -> &'static Path {
    // foodgram-core/tests/shopping_list_tests.rs -> go up to project root
    Path::new(env!("CARGO_MANIFEST_DIR")).parent().unwrap()
}

fn item(name: &str, unit: &str, amount: i64) -> ShoppingItem {
    ShoppingItem {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        amount,
    }
}

#[test]
fn test_seed_file_parses_cleanly() {
    let path = project_root().join("data/ingredients.csv");
    let file = File::open(&path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {}", path.display(), e));
    let parsed = parse_ingredients(file).unwrap();

    assert!(parsed.skipped.is_empty(), "skipped rows: {:?}", parsed.skipped);
    assert_eq!(parsed.duplicates, 0);
    assert!(parsed
        .rows
        .iter()
        .any(|row| row.name == "молоко" && row.measurement_unit == "мл"));
}

#[test]
fn test_prefix_search_pattern_for_seed_names() {
    // The database matches with ILIKE; the pattern must anchor at the start.
    assert_eq!(prefix_pattern("мо"), "мо%");

    let path = project_root().join("data/ingredients.csv");
    let parsed = parse_ingredients(File::open(path).unwrap()).unwrap();
    let starting: Vec<&str> = parsed
        .rows
        .iter()
        .map(|row| row.name.as_str())
        .filter(|name| name.to_lowercase().starts_with("мо"))
        .collect();

    assert_eq!(starting, vec!["молоко", "морковь", "мороженое"]);
    // Contains "мо" but does not start with it.
    assert!(parsed.rows.iter().any(|row| row.name == "лимон"));
    assert!(!starting.contains(&"лимон"));
}

#[test]
fn test_recipe_with_repeated_ingredient_is_rejected() {
    let flour = Uuid::new_v4();
    let lines = [
        IngredientAmount { id: flour, amount: 100 },
        IngredientAmount { id: flour, amount: 50 },
    ];
    let draft = RecipeDraft {
        name: Some("Pancakes"),
        text: Some("Mix and fry."),
        cooking_time: Some(20),
        image: Some("data:image/png;base64,AAAA"),
        ingredients: Some(&lines),
        tags: None,
    };

    let errors = validate_recipe(&draft, WriteMode::Create).unwrap_err();
    assert!(errors.contains("ingredients"));
    assert!(!errors.contains("name"));
}

#[test]
fn test_grouped_cart_renders_one_line_per_product() {
    // Recipe A uses 100 g flour and recipe B 50 g; grouping yields 150 g.
    let list = ShoppingList {
        date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        items: vec![item("flour", "g", 150), item("milk", "ml", 200)],
        recipes: vec![
            CartRecipe {
                name: "Pancakes".to_string(),
                author: author_display_name("Jane", "Doe", "jane"),
            },
            CartRecipe {
                name: "Crepes".to_string(),
                author: author_display_name("", "", "chef"),
            },
        ],
    };

    assert_eq!(list.items[0].to_string(), "flour (g) — 150");

    let text = list.render();
    let expected = "\
Shopping list for 18.10.2026

Products:
1. Flour (g) — 150
2. Milk (ml) — 200

Recipes:
• Pancakes (author: Jane Doe)
• Crepes (author: chef)
";
    assert_eq!(text, expected);
}

#[test]
fn test_short_link_round_trip() {
    let id = Uuid::new_v4();
    let code = short_link::encode(id);
    assert_eq!(code.len(), 22);
    assert_eq!(short_link::decode(&code).unwrap(), id);
}
