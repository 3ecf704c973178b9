pub mod auth;
pub mod health;
pub mod notifications;
pub mod profile;
pub mod roles;
