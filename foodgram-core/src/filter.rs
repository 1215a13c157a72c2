use uuid::Uuid;

use crate::pagination::PageRequest;
use crate::query::{is_truthy, query_pairs};

/// Filters accepted by the recipe listing.
///
/// Values that fail to parse are ignored rather than rejected, so a malformed
/// `author` simply means "no author filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub author: Option<Uuid>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub page: PageRequest,
}

impl RecipeFilter {
    pub fn parse(query: Option<&str>) -> Self {
        let mut filter = RecipeFilter {
            page: PageRequest::from_query(query),
            ..RecipeFilter::default()
        };

        for (key, value) in query_pairs(query.unwrap_or("")) {
            match key.as_str() {
                "tags" => {
                    let slug = value.trim();
                    if !slug.is_empty() && !filter.tags.iter().any(|t| t == slug) {
                        filter.tags.push(slug.to_string());
                    }
                }
                "author" => filter.author = Uuid::parse_str(value.trim()).ok(),
                "is_favorited" => filter.is_favorited = is_truthy(&value),
                "is_in_shopping_cart" => filter.is_in_shopping_cart = is_truthy(&value),
                _ => {}
            }
        }

        filter
    }

    /// The favorites restriction only applies to an authenticated viewer.
    pub fn favorited_by(&self, viewer: Option<Uuid>) -> Option<Uuid> {
        viewer.filter(|_| self.is_favorited)
    }

    /// The cart restriction only applies to an authenticated viewer.
    pub fn in_cart_of(&self, viewer: Option<Uuid>) -> Option<Uuid> {
        viewer.filter(|_| self.is_in_shopping_cart)
    }
}

/// `recipes_limit` is honoured only when it is a plain non-negative integer.
pub fn parse_recipes_limit(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(RecipeFilter::parse(None), RecipeFilter::default());
        assert_eq!(RecipeFilter::parse(Some("")), RecipeFilter::default());
    }

    #[test]
    fn test_parse_multi_valued_tags() {
        let filter = RecipeFilter::parse(Some("tags=breakfast&tags=dinner&tags=breakfast"));
        assert_eq!(filter.tags, vec!["breakfast", "dinner"]);
    }

    #[test]
    fn test_parse_author_and_flags() {
        let author = Uuid::new_v4();
        let query = format!("author={}&is_favorited=1&is_in_shopping_cart=0", author);
        let filter = RecipeFilter::parse(Some(&query));
        assert_eq!(filter.author, Some(author));
        assert!(filter.is_favorited);
        assert!(!filter.is_in_shopping_cart);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let filter = RecipeFilter::parse(Some("author=42&page=abc&limit=&is_favorited=yes"));
        assert_eq!(filter.author, None);
        assert_eq!(filter.page, PageRequest::default());
        assert!(!filter.is_favorited);
    }

    #[test]
    fn test_page_and_limit() {
        let filter = RecipeFilter::parse(Some("page=2&limit=10"));
        assert_eq!(filter.page, PageRequest::new(Some(2), Some(10)));
    }

    #[test]
    fn test_flags_are_noops_for_anonymous() {
        let filter = RecipeFilter::parse(Some("is_favorited=1&is_in_shopping_cart=1"));
        assert_eq!(filter.favorited_by(None), None);
        assert_eq!(filter.in_cart_of(None), None);

        let viewer = Uuid::new_v4();
        assert_eq!(filter.favorited_by(Some(viewer)), Some(viewer));
        assert_eq!(filter.in_cart_of(Some(viewer)), Some(viewer));
    }

    #[test]
    fn test_flags_off_ignore_viewer() {
        let filter = RecipeFilter::parse(Some("is_favorited=0"));
        assert_eq!(filter.favorited_by(Some(Uuid::new_v4())), None);
    }

    #[test]
    fn test_recipes_limit() {
        assert_eq!(parse_recipes_limit(Some("3")), Some(3));
        assert_eq!(parse_recipes_limit(Some("0")), Some(0));
        assert_eq!(parse_recipes_limit(Some("-1")), None);
        assert_eq!(parse_recipes_limit(Some("abc")), None);
        assert_eq!(parse_recipes_limit(None), None);
    }
}
