#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum_test::TestServer;
use serde_json::{Value, json};
use warden_core::{
    AccountService, AccountStore, Argon2Settings, AuthCrypto,
    InMemoryAccountRepository, PasswordPolicy, RegistrationSettings,
};
use warden_server::{
    AppState, create_router, identity::HeaderIdentityResolver,
};

pub const ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const ADMIN_ID: &str = "admin-1";
pub const STAFF_PASSWORD: &str = "Abcdef1!";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn build_test_app() -> Result<TestApp> {
    build_test_app_with(RegistrationSettings::default())
}

pub fn build_test_app_with(registration: RegistrationSettings) -> Result<TestApp> {
    let crypto = AuthCrypto::with_settings("test-pepper", Argon2Settings::minimal())?;
    let store = AccountStore::new(
        Arc::new(InMemoryAccountRepository::new()),
        Arc::new(crypto),
        PasswordPolicy::standard(),
    );
    let resolver = HeaderIdentityResolver::new(ID_HEADER, ROLE_HEADER)?;
    let state = AppState::new(
        AccountService::new(store, registration),
        Arc::new(resolver),
    );

    let server = TestServer::builder()
        .build(create_router(state.clone()))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok(TestApp { server, state })
}

pub fn user_path(id: &str) -> String {
    format!("/users/{id}")
}

pub fn password_path(id: &str) -> String {
    format!("/users/{id}/password")
}

pub fn staff_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "role": "staff",
        "password": STAFF_PASSWORD,
    })
}

/// Create a staff account as the admin and return its id.
pub async fn create_staff(server: &TestServer, username: &str, email: &str) -> String {
    let response = server
        .post("/users")
        .add_header(ID_HEADER, ADMIN_ID)
        .add_header(ROLE_HEADER, "admin")
        .json(&staff_body(username, email))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["id"]
        .as_str()
        .unwrap_or_else(|| panic!("created account has no id: {body}"))
        .to_string()
}
