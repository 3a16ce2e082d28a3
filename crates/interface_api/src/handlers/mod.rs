//! Request handlers

pub mod health;
pub mod auth;
pub mod preferences;
pub mod wizard;
pub mod activity;
