// Utilidades compartilhadas pelos testes de banco.
#![allow(dead_code)]

use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use canteiro::config::{AppState, Settings, FALLBACK_COMPANY_ID};

pub const COMPANY_ABC: Uuid = FALLBACK_COMPANY_ID;
pub const COMPANY_XYZ: Uuid = Uuid::from_u128(0x22222222_0000_0000_0000_000000000002);

pub const MARIA: Uuid = Uuid::from_u128(0x11111111_0000_0000_0000_000000000001);
pub const JOAO: Uuid = Uuid::from_u128(0x11111111_0000_0000_0000_000000000002);
pub const ANA: Uuid = Uuid::from_u128(0x11111111_0000_0000_0000_000000000003);

pub const FURADEIRA: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000001);
pub const SERRA: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000002);
pub const PARAFUSADEIRA: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000003);
pub const DRILL_BANCADA: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000004);
pub const BETONEIRA: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000005);
pub const DRILL_XYZ: Uuid = Uuid::from_u128(0x44444444_0000_0000_0000_000000000006);

pub const NOTIFICACAO: Uuid = Uuid::from_u128(0x55555555_0000_0000_0000_000000000001);

pub fn settings() -> Settings {
    Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".into(),
        db_max_connections: 1,
        session_ttl_days: 7,
        profile_trigger_wait: Duration::from_millis(0),
        default_company_name: "Construtora ABC Ltda".into(),
    }
}

pub fn state(pool: PgPool) -> AppState {
    AppState::from_pool(pool, settings())
}

pub async fn movement_count(pool: &PgPool, tool_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM tool_movements WHERE tool_id = $1")
        .bind(tool_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
