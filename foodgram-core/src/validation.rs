//! Business-rule checks for incoming payloads.
//!
//! Everything here is storage-independent: the server still has to verify that
//! referenced ingredient and tag ids exist, and uniqueness of e-mail/username is
//! left to the database indexes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::FieldErrors;

pub const MAX_RECIPE_NAME_LENGTH: usize = 256;
pub const MIN_COOKING_TIME: i64 = 1;
pub const MAX_COOKING_TIME: i64 = 32_000;
pub const MIN_AMOUNT: i64 = 1;
pub const MAX_AMOUNT: i64 = 32_000;

pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MAX_NAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const REQUIRED: &str = "This field is required.";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// One `(ingredient, amount)` pair as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    pub id: Uuid,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

/// Borrowed view of a recipe create/update payload.
///
/// `None` means the field was absent from the request.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecipeDraft<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub cooking_time: Option<i64>,
    pub image: Option<&'a str>,
    pub ingredients: Option<&'a [IngredientAmount]>,
    pub tags: Option<&'a [Uuid]>,
}

/// Validate a recipe payload, collecting every failing field.
///
/// `ingredients` is mandatory for both modes because updates replace the whole
/// ingredient-line set. Simple fields are only mandatory on create.
pub fn validate_recipe(draft: &RecipeDraft<'_>, mode: WriteMode) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let creating = mode == WriteMode::Create;

    match draft.name {
        Some(name) if name.trim().is_empty() => errors.add("name", "Name cannot be empty"),
        Some(name) if name.chars().count() > MAX_RECIPE_NAME_LENGTH => errors.add(
            "name",
            format!("Name must be at most {} characters", MAX_RECIPE_NAME_LENGTH),
        ),
        Some(_) => {}
        None if creating => errors.add("name", REQUIRED),
        None => {}
    }

    match draft.text {
        Some(text) if text.trim().is_empty() => errors.add("text", "Text cannot be empty"),
        Some(_) => {}
        None if creating => errors.add("text", REQUIRED),
        None => {}
    }

    match draft.cooking_time {
        Some(minutes) if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&minutes) => errors.add(
            "cooking_time",
            format!(
                "Cooking time must be between {} and {} minutes",
                MIN_COOKING_TIME, MAX_COOKING_TIME
            ),
        ),
        Some(_) => {}
        None if creating => errors.add("cooking_time", REQUIRED),
        None => {}
    }

    match draft.image {
        Some(image) if image.trim().is_empty() => errors.add("image", REQUIRED),
        Some(_) => {}
        None if creating => errors.add("image", REQUIRED),
        None => {}
    }

    match draft.ingredients {
        None => errors.add("ingredients", REQUIRED),
        Some(lines) => validate_ingredient_lines(lines, &mut errors),
    }

    if let Some(tags) = draft.tags {
        if has_duplicates(tags.iter()) {
            errors.add("tags", "Tags must not repeat");
        }
    }

    errors.into_result()
}

fn validate_ingredient_lines(lines: &[IngredientAmount], errors: &mut FieldErrors) {
    if lines.is_empty() {
        errors.add("ingredients", "At least one ingredient is required");
        return;
    }

    if has_duplicates(lines.iter().map(|line| &line.id)) {
        errors.add("ingredients", "Ingredients must not repeat");
    }

    if lines
        .iter()
        .any(|line| !(MIN_AMOUNT..=MAX_AMOUNT).contains(&line.amount))
    {
        errors.add(
            "ingredients",
            format!("Amount must be between {} and {}", MIN_AMOUNT, MAX_AMOUNT),
        );
    }
}

fn has_duplicates<'a, T, I>(items: I) -> bool
where
    T: Eq + std::hash::Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    items.into_iter().any(|item| !seen.insert(item))
}

/// Ids from `requested` that are not present in `found`, in request order.
pub fn missing_ids(requested: &[Uuid], found: &[Uuid]) -> Vec<Uuid> {
    let found: HashSet<&Uuid> = found.iter().collect();
    requested
        .iter()
        .filter(|id| !found.contains(id))
        .copied()
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SignupDraft<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password: &'a str,
}

pub fn validate_signup(draft: &SignupDraft<'_>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let email = draft.email.trim();
    if email.is_empty() {
        errors.add("email", REQUIRED);
    } else if email.len() > MAX_EMAIL_LENGTH || !EMAIL_RE.is_match(email) {
        errors.add("email", "Enter a valid email address");
    }

    let username = draft.username.trim();
    if username.is_empty() {
        errors.add("username", REQUIRED);
    } else if username.chars().count() > MAX_NAME_LENGTH {
        errors.add(
            "username",
            format!("Username must be at most {} characters", MAX_NAME_LENGTH),
        );
    } else if !USERNAME_RE.is_match(username) {
        errors.add(
            "username",
            "Username may contain only letters, digits and @/./+/-/_",
        );
    }

    for (field, value) in [
        ("first_name", draft.first_name),
        ("last_name", draft.last_name),
    ] {
        let value = value.trim();
        if value.is_empty() {
            errors.add(field, REQUIRED);
        } else if value.chars().count() > MAX_NAME_LENGTH {
            errors.add(
                field,
                format!("Must be at most {} characters", MAX_NAME_LENGTH),
            );
        }
    }

    if let Err(password_errors) = validate_password(draft.password) {
        errors.merge(password_errors);
    }

    errors.into_result()
}

pub fn validate_password(password: &str) -> Result<(), FieldErrors> {
    if password.is_empty() {
        return Err(FieldErrors::single("password", REQUIRED));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(FieldErrors::single(
            "password",
            format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ),
        ));
    }
    Ok(())
}
