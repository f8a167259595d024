// Cadastro, login e sessão contra um Postgres real.
// Rodar com `DATABASE_URL=... cargo test -- --ignored`.

mod common;

use sqlx::PgPool;
use uuid::Uuid;

use canteiro::{
    common::error::AppError,
    config::AppState,
    models::{auth::SignUpPayload, profile::UserRole},
};
use common::*;

fn sign_up(email: &str, role: &str, company_code: &str) -> SignUpPayload {
    SignUpPayload {
        email: email.into(),
        password: "Senha@123".into(),
        full_name: "Carlos Alves".into(),
        cpf: "529.982.247-25".into(),
        role: role.into(),
        company_code: company_code.into(),
        phone: None,
    }
}

async fn profile_row(pool: &PgPool, id: Uuid) -> (i64, Option<UserRole>, Option<Uuid>) {
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap();
    let row: Option<(UserRole, Uuid)> =
        sqlx::query_as("SELECT role, company_id FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .unwrap();
    (count, row.map(|r| r.0), row.map(|r| r.1))
}

#[sqlx::test(migrations = "./migrations", fixtures("canteiro"))]
#[ignore]
async fn sign_up_leaves_exactly_one_profile(pool: PgPool) {
    let app_state = state(pool.clone());

    let response = app_state
        .auth_service
        .sign_up(&sign_up("carlos@xyz.com.br", "Mestre de Obras", "xyz002"))
        .await
        .unwrap();

    let (count, role, company) = profile_row(&pool, response.session.user_id).await;
    assert_eq!(count, 1);
    assert_eq!(role, Some(UserRole::MestreObras));
    assert_eq!(company, Some(COMPANY_XYZ));
}

#[sqlx::test(migrations = "./migrations", fixtures("canteiro"))]
#[ignore]
async fn unknown_company_code_falls_back_to_default(pool: PgPool) {
    let app_state = state(pool.clone());

    let response = app_state
        .auth_service
        .sign_up(&sign_up("pedro@obra.com.br", "Ajudante", "NAOEXISTE"))
        .await
        .unwrap();

    let (count, role, company) = profile_row(&pool, response.session.user_id).await;
    assert_eq!(count, 1);
    assert_eq!(role, Some(UserRole::Operario));
    assert_eq!(company, Some(COMPANY_ABC));
}

#[sqlx::test(migrations = "./migrations", fixtures("canteiro"))]
#[ignore]
async fn configured_default_company_is_used_by_every_provisioning_path(pool: PgPool) {
    let mut settings = settings();
    settings.default_company_name = "Obras XYZ S.A.".into();
    let app_state = AppState::from_pool(pool.clone(), settings);

    let response = app_state
        .auth_service
        .sign_up(&sign_up("rui@obra.com.br", "Operário", "NAOEXISTE"))
        .await
        .unwrap();

    let (count, _, company) = profile_row(&pool, response.session.user_id).await;
    assert_eq!(count, 1);
    assert_eq!(company, Some(COMPANY_XYZ));

    // Chamada direta ao procedimento, sem passar pelo gatilho
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO auth_users (id, email, password_hash) VALUES ($1, 'direto@obra.com.br', 'x')")
        .bind(user_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query_scalar::<_, Uuid>(
        "SELECT create_profile_for_user($1, 'direto@obra.com.br', 'Direto', '', 'operario', 'NAOEXISTE', NULL, $2)",
    )
    .bind(user_id)
    .bind("Obras XYZ S.A.")
    .fetch_one(&pool)
    .await
    .unwrap();

    let (_, _, company) = profile_row(&pool, user_id).await;
    assert_eq!(company, Some(COMPANY_XYZ));
}

#[sqlx::test(migrations = "./migrations", fixtures("canteiro"))]
#[ignore]
async fn duplicate_email_is_rejected(pool: PgPool) {
    let app_state = state(pool.clone());

    let result = app_state
        .auth_service
        .sign_up(&sign_up("maria@abc.com.br", "Almoxarife", "ABC001"))
        .await;

    assert!(matches!(result, Err(AppError::EmailAlreadyExists)));
}

#[sqlx::test(migrations = "./migrations", fixtures("canteiro"))]
#[ignore]
async fn sign_in_then_sign_out_revokes_the_token(pool: PgPool) {
    let app_state = state(pool.clone());
    let auth = &app_state.auth_service;

    auth.sign_up(&sign_up("bia@abc.com.br", "Encarregado", "ABC001"))
        .await
        .unwrap();

    let wrong = auth.sign_in("bia@abc.com.br", "Errada@123").await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let session = auth
        .sign_in("bia@abc.com.br", "Senha@123")
        .await
        .unwrap()
        .session;

    let user = auth.validate_token(&session.access_token).await.unwrap();
    assert_eq!(user.user_id, session.user_id);

    let info = auth.session_info(Some(&session.access_token)).await;
    assert_eq!(info.session.map(|s| s.user_id), Some(session.user_id));

    auth.sign_out(&user).await;

    let revoked = auth.validate_token(&session.access_token).await;
    assert!(matches!(revoked, Err(AppError::InvalidToken)));
    assert!(auth.session_info(Some(&session.access_token)).await.session.is_none());
}
