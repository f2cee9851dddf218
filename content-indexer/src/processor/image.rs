//! Image identifier derivation.
//!
//! An image and its image set share the most significant half of their
//! identifiers. The least significant halves differ by a fixed mask, so the
//! same XOR turns either one into the other.

use lazy_static::lazy_static;
use md5::{Digest, Md5};
use uuid::{Builder, Uuid};

use crate::errors::ProcessError;

const IMAGE_SET_SEED: &str = "imageset";

const THUMBNAIL_URL_TEMPLATE: &str = "https://www.ft.com/__origami/service/image/v2/images/raw/http%3A%2F%2Fprod-upp-image-read.ft.com%2F{image_uuid}?source=search&fit=scale-down&width=167";

lazy_static! {
    /// Least significant half of the name-based (MD5) uuid of the seed.
    pub static ref IMAGE_SET_MAGIC: u64 = {
        let digest: [u8; 16] = Md5::digest(IMAGE_SET_SEED.as_bytes()).into();
        Builder::from_md5_bytes(digest).into_uuid().as_u64_pair().1
    };
}

/// Swap between an image set id and its image id.
pub fn derive(id: Uuid) -> Uuid {
    let (most, least) = id.as_u64_pair();
    Uuid::from_u64_pair(most, least ^ *IMAGE_SET_MAGIC)
}

/// Parse `value` and derive its counterpart.
pub fn derive_image_uuid(value: &str) -> Result<Uuid, ProcessError> {
    let id = Uuid::parse_str(value)
        .map_err(|e| ProcessError::invalid_identifier(value, e.to_string()))?;
    Ok(derive(id))
}

/// Image service URL of the search thumbnail for an image.
pub fn thumbnail_url(image_id: &Uuid) -> String {
    THUMBNAIL_URL_TEMPLATE.replace("{image_uuid}", &image_id.hyphenated().to_string())
}
