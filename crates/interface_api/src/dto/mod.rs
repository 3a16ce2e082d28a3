//! Request and response bodies

pub mod auth;
pub mod preferences;
pub mod wizard;
pub mod activity;
