pub mod activity_service;
pub mod auth;
pub mod dashboard_service;
pub mod label_service;
pub mod maintenance_service;
pub mod notification_service;
pub mod profile_service;
pub mod tool_service;
