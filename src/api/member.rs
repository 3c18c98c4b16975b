use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::MemberFilter;
use crate::infrastructure::AppState;
use crate::models::MemberDto;
use crate::services::lookup;

use super::domain_error;

#[derive(Deserialize)]
pub struct ListMembersQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
}

pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<ListMembersQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let members = state
        .member_repo
        .find_all(MemberFilter {
            role: query.role,
            status: query.status,
            query: query.q,
        })
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "members": members, "total": members.len() })))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(payload): Json<MemberDto>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    let member = state
        .member_repo
        .create(payload)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "member": member, "message": "Member registered successfully" })),
    ))
}

pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let member = state
        .member_repo
        .find_by_id(id)
        .await
        .map_err(domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "Member not found".to_string()))?;

    Ok(Json(json!({ "member": member })))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<MemberDto>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let member = state
        .member_repo
        .update(id, payload)
        .await
        .map_err(domain_error)?;

    Ok(Json(json!({ "member": member, "message": "Member updated successfully" })))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.member_repo.delete(id).await.map_err(domain_error)?;

    Ok(Json(json!({ "message": "Member deleted successfully" })))
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub q: Option<String>,
}

pub async fn lookup_member(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let q = query.q.unwrap_or_default();

    let members = state
        .member_repo
        .find_all(MemberFilter::default())
        .await
        .map_err(domain_error)?;

    let outcome = lookup::find_member(&members, &q);

    if !q.trim().is_empty() && outcome.is_empty() {
        return Err((StatusCode::NOT_FOUND, "Member not found".to_string()));
    }

    Ok(Json(json!({
        "selected": outcome.selected,
        "candidates": outcome.candidates,
    })))
}
