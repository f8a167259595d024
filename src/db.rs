pub mod activity_repo;
pub use activity_repo::ActivityRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod profile_repo;
pub use profile_repo::ProfileRepository;
pub mod tool_repo;
pub use tool_repo::ToolRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
