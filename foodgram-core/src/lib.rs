pub mod error;
pub mod filter;
pub mod image;
pub mod ingredients_csv;
pub mod pagination;
pub mod query;
pub mod shopping_list;
pub mod short_link;
pub mod validation;

pub use error::{CsvError, FieldErrors, ImageError, ShortLinkError};
pub use filter::{parse_recipes_limit, RecipeFilter};
pub use image::{decode_data_uri, validate_image, DecodedImage, MAX_FILE_SIZE};
pub use ingredients_csv::{parse_ingredients, IngredientRow, ParsedIngredients, SkippedRow};
pub use pagination::{page_link, PageRequest};
pub use shopping_list::{author_display_name, CartRecipe, ShoppingItem, ShoppingList};
pub use validation::{
    missing_ids, validate_password, validate_recipe, validate_signup, IngredientAmount,
    RecipeDraft, SignupDraft, WriteMode,
};
