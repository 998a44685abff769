pub mod access_token;
pub mod grants;

pub use access_token::{AccessToken, Claims, TokenError, DEFAULT_TTL};
pub use grants::VideoGrants;
