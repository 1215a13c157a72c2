//! Image blobs submitted as data URIs (recipe images and avatars).

use crate::api::error::ApiError;
use crate::models::NewPhoto;
use crate::schema::photos;
use diesel::prelude::*;
use foodgram_core::{decode_data_uri, DecodedImage};
use uuid::Uuid;

/// Decode a data URI from the request field `field`, reporting failures
/// against that field.
pub fn decode_field(field: &str, value: &str) -> Result<DecodedImage, ApiError> {
    decode_data_uri(value).map_err(|e| ApiError::field(field, e.to_string()))
}

pub fn insert_photo(
    conn: &mut PgConnection,
    user_id: Uuid,
    image: &DecodedImage,
) -> QueryResult<Uuid> {
    let new_photo = NewPhoto {
        user_id,
        content_type: &image.content_type,
        data: &image.data,
    };

    diesel::insert_into(photos::table)
        .values(&new_photo)
        .returning(photos::id)
        .get_result(conn)
}

pub fn delete_photo(conn: &mut PgConnection, photo_id: Uuid) -> QueryResult<usize> {
    diesel::delete(photos::table.find(photo_id)).execute(conn)
}
