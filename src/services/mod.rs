// Relay Services
// Request authentication, OAuth token handling, and the YouTube API client

mod auth;
mod oauth;
mod thumbnail;
mod youtube;

pub use auth::*;
pub use oauth::*;
pub use thumbnail::*;
pub use youtube::*;
