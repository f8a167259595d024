pub mod auth;
pub mod company;
pub mod dashboard;
pub mod maintenance;
pub mod movement;
pub mod notification;
pub mod profile;
pub mod tool;
