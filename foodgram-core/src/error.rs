use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field-keyed validation messages, e.g. `{"name": ["This field is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImageError {
    #[error("Expected a data:<mime>;base64,<payload> string")]
    NotDataUri,

    #[error("Invalid base64 payload")]
    InvalidBase64,

    #[error("Image is empty")]
    Empty,

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),
}

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Failed to read CSV: {0}")]
    Read(#[from] csv::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShortLinkError {
    #[error("Short link code is not valid base64")]
    InvalidEncoding,

    #[error("Short link code has wrong length: {0} bytes")]
    WrongLength(usize),
}
