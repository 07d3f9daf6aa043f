//! Object key generation.
//!
//! Keys are 32 bytes from the thread-local CSPRNG, URL-safe base64 without padding,
//! followed by `.` and the canonical extension. They do not depend on the video ID,
//! so repeated uploads for the same video never overwrite each other.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::Rng;

const KEY_BYTES: usize = 32;

pub fn random_key(extension: &str) -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::rng().fill(&mut bytes);
    format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), extension)
}
