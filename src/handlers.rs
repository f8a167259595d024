pub mod activities;
pub mod auth;
pub mod dashboard;
pub mod maintenance;
pub mod notifications;
pub mod profile;
pub mod tools;
