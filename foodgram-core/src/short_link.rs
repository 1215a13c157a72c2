//! Short recipe links: the 16 bytes of a recipe UUID as unpadded URL-safe
//! base64 (22 characters).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use uuid::Uuid;

use crate::error::ShortLinkError;

pub fn encode(id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

pub fn decode(code: &str) -> Result<Uuid, ShortLinkError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(code)
        .map_err(|_| ShortLinkError::InvalidEncoding)?;
    Uuid::from_slice(&bytes).map_err(|_| ShortLinkError::WrongLength(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_is_short_and_reversible() {
        let id = Uuid::new_v4();
        let code = encode(id);
        assert_eq!(code.len(), 22);
        assert!(code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode(&code), Ok(id));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(decode("not base64!"), Err(ShortLinkError::InvalidEncoding));
        assert_eq!(decode("AAAA"), Err(ShortLinkError::WrongLength(3)));
    }
}
