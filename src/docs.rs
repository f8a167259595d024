// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::sign_out,
        handlers::auth::get_session,

        // --- Profile ---
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::profile::get_user_stats,

        // --- Tools ---
        handlers::tools::list_tools,
        handlers::tools::get_tool,
        handlers::tools::create_tool,
        handlers::tools::update_tool,
        handlers::tools::delete_tool,
        handlers::tools::assign_tool,
        handlers::tools::return_tool,
        handlers::tools::send_to_maintenance,
        handlers::tools::return_from_maintenance,
        handlers::tools::get_tool_qrcode,
        handlers::tools::list_categories,
        handlers::tools::create_category,

        // --- Maintenance ---
        handlers::maintenance::list_maintenance_records,
        handlers::maintenance::create_maintenance_record,

        // --- Activities / Dashboard ---
        handlers::activities::list_activities,
        handlers::dashboard::get_dashboard,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Session,
            models::auth::Landing,
            models::auth::SessionInfo,
            models::auth::SignUpPayload,
            models::auth::SignInPayload,
            models::auth::AuthResponse,

            // --- Profile ---
            models::company::Company,
            models::profile::UserRole,
            models::profile::Profile,
            models::profile::ProfileWithCompany,
            models::profile::UpdateProfilePayload,
            models::profile::UserStats,

            // --- Tools ---
            models::tool::ToolStatus,
            models::tool::ToolAction,
            models::tool::ToolCategory,
            models::tool::CreateCategoryPayload,
            models::tool::Tool,
            models::tool::ToolWithRelations,
            models::tool::ToolDetails,
            models::tool::CreateToolPayload,
            models::tool::ToolChanges,
            models::tool::AssignToolPayload,
            models::tool::ReturnToolPayload,
            models::tool::MaintenancePayload,

            // --- Maintenance ---
            models::maintenance::MaintenanceType,
            models::maintenance::MaintenanceStatus,
            models::maintenance::MaintenanceRecord,
            models::maintenance::CreateMaintenancePayload,

            // --- Movements ---
            models::movement::MovementAction,
            models::movement::ToolMovement,
            models::movement::Activity,

            // --- Dashboard ---
            models::dashboard::StatusCounts,
            models::dashboard::DashboardStats,

            // --- Notifications ---
            models::notification::NotificationType,
            models::notification::Notification,
        )
    ),
    tags(
        (name = "Auth", description = "Cadastro, login e sessão"),
        (name = "Profile", description = "Perfil do usuário e estatísticas"),
        (name = "Tools", description = "Inventário e ciclo de vida das ferramentas"),
        (name = "Maintenance", description = "Histórico de manutenção"),
        (name = "Activities", description = "Movimentações recentes"),
        (name = "Dashboard", description = "Indicadores do canteiro"),
        (name = "Notifications", description = "Notificações do usuário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
