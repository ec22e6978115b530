//! Digest of the releases collected on a given date.

mod models;
mod query;
mod render;

pub use models::{Digest, DigestAlbum, DigestArtist, DigestSingle, DigestTrack};
pub use query::DigestQuery;
pub use render::{escape_html, render_digest_html, DIGEST_TITLE};
