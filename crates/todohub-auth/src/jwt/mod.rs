//! JWT access token encoding, decoding, and claims management.
//!
//! Only access tokens are JWTs. Refresh secrets are opaque random strings
//! whose source of truth is the `refresh_tokens` table; see [`crate::secret`].

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::Claims;
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
