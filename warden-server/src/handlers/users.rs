use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::debug;
use warden_core::{
    AccountId, AccountOperation, AccountView, CallerIdentity, CreateAccountRequest,
    PasswordChangeRequest, UpdateAccountRequest,
};

use crate::{
    AppState,
    identity::{Caller, MaybeCaller},
    infra::errors::{AppError, AppResult},
};

/// Turn a path id into the target of `operation`, deciding access first.
///
/// A path id that is not an account id names nobody's record. The caller is
/// judged as for any record they do not own, and only an allowed caller
/// learns that no such account exists.
fn resolve_target(
    state: &AppState,
    caller: &CallerIdentity,
    raw: &str,
    operation: fn(AccountId) -> AccountOperation,
) -> AppResult<AccountId> {
    match raw.parse() {
        Ok(id) => Ok(id),
        Err(_) => {
            state
                .accounts
                .check_access(Some(caller), operation(AccountId::new()))?;
            debug!(id = raw, "path id is not an account id");
            Err(AppError::not_found("Account not found"))
        }
    }
}

/// Unwrap a JSON body only once the caller is known to be allowed.
///
/// A refused caller gets the refusal, not a complaint about the body.
fn accept_body<T>(
    state: &AppState,
    caller: Option<&CallerIdentity>,
    operation: AccountOperation,
    body: Result<Json<T>, JsonRejection>,
) -> AppResult<T> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            state.accounts.check_access(caller, operation)?;
            Err(rejection.into())
        }
    }
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    MaybeCaller(caller): MaybeCaller,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AccountView>)> {
    let request = accept_body(
        &state,
        caller.as_ref(),
        AccountOperation::CreateAccount,
        body,
    )?;
    let account = state
        .accounts
        .create_account(caller.as_ref(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> AppResult<Json<Vec<AccountView>>> {
    Ok(Json(state.accounts.list_accounts(&caller).await?))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> AppResult<Json<AccountView>> {
    let id = resolve_target(&state, &caller, &id, AccountOperation::ReadAccount)?;
    Ok(Json(state.accounts.get_account(&caller, id).await?))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    body: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> AppResult<Json<AccountView>> {
    let id = resolve_target(&state, &caller, &id, AccountOperation::UpdateAccount)?;
    let request = accept_body(
        &state,
        Some(&caller),
        AccountOperation::UpdateAccount(id),
        body,
    )?;
    Ok(Json(
        state.accounts.update_account(&caller, id, request).await?,
    ))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = resolve_target(&state, &caller, &id, AccountOperation::DeleteAccount)?;
    state.accounts.delete_account(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn change_password_handler(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    body: Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = resolve_target(&state, &caller, &id, AccountOperation::ChangePassword)?;
    let request = accept_body(
        &state,
        Some(&caller),
        AccountOperation::ChangePassword(id),
        body,
    )?;
    state.accounts.change_password(&caller, id, request).await?;
    Ok(Json(json!({ "status": "ok" })))
}
