// Broadcast Relay
// Stateless HTTP relay that creates YouTube live broadcasts on behalf of a
// single pre-authorized channel using a stored refresh token.

pub mod config;
pub mod models;
pub mod server;
pub mod services;
