use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::catalog::{Lookup, LookupInput, LookupKind};
use crate::errors::AppError;

use super::{blocking, AppState};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupBody {
    pub name: String,
    /// Colors: `{"hexCode"}`; sizes: `{"chest", "waist"}`; FAQs: `{"answer"}`.
    #[schema(value_type = Option<Object>)]
    pub attributes: Option<Value>,
    pub actor_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorParams {
    pub actor_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub id: i32,
    pub kind: LookupKind,
    pub name: String,
    #[schema(value_type = Object)]
    pub attributes: Value,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<Lookup> for LookupResponse {
    fn from(l: Lookup) -> Self {
        LookupResponse {
            id: l.id,
            kind: l.kind,
            name: l.name,
            attributes: l.attributes,
            created_at: l.created_at.to_rfc3339(),
            updated_at: l.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

impl From<LookupBody> for LookupInput {
    fn from(b: LookupBody) -> Self {
        LookupInput {
            name: b.name,
            attributes: b.attributes,
            actor_id: b.actor_id,
        }
    }
}

/// GET /catalog/{kind}
///
/// Lists the active entries of one kind of reference data.
#[utoipa::path(
    get,
    path = "/catalog/{kind}",
    params(("kind" = LookupKind, Path, description = "Kind of reference data")),
    responses(
        (status = 200, description = "Active entries", body = [LookupResponse]),
        (status = 400, description = "Unknown kind"),
    ),
    tag = "catalog"
)]
pub async fn list_lookups(
    state: web::Data<AppState>,
    path: web::Path<LookupKind>,
) -> Result<HttpResponse, AppError> {
    let kind = path.into_inner();
    let lookups = blocking(&state, move |s| s.catalog.list_lookups(kind)).await?;
    Ok(HttpResponse::Ok().json(
        lookups
            .into_iter()
            .map(LookupResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// POST /catalog/{kind}
#[utoipa::path(
    post,
    path = "/catalog/{kind}",
    params(("kind" = LookupKind, Path, description = "Kind of reference data")),
    request_body = LookupBody,
    responses(
        (status = 201, description = "Entry created", body = LookupResponse),
        (status = 400, description = "Invalid fields or duplicate name"),
    ),
    tag = "catalog"
)]
pub async fn create_lookup(
    state: web::Data<AppState>,
    path: web::Path<LookupKind>,
    body: web::Json<LookupBody>,
) -> Result<HttpResponse, AppError> {
    let kind = path.into_inner();
    let input = LookupInput::from(body.into_inner());

    let created = blocking(&state, move |s| s.catalog.create_lookup(kind, input)).await?;
    Ok(HttpResponse::Created().json(LookupResponse::from(created)))
}

/// PUT /catalog/{kind}/{id}
#[utoipa::path(
    put,
    path = "/catalog/{kind}/{id}",
    params(
        ("kind" = LookupKind, Path, description = "Kind of reference data"),
        ("id" = i32, Path, description = "Entry id"),
    ),
    request_body = LookupBody,
    responses(
        (status = 200, description = "Entry updated", body = LookupResponse),
        (status = 400, description = "Invalid fields or duplicate name"),
        (status = 404, description = "No active entry of this kind with that id"),
    ),
    tag = "catalog"
)]
pub async fn update_lookup(
    state: web::Data<AppState>,
    path: web::Path<(LookupKind, i32)>,
    body: web::Json<LookupBody>,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let input = LookupInput::from(body.into_inner());

    let updated = blocking(&state, move |s| s.catalog.update_lookup(kind, id, input)).await?;
    Ok(HttpResponse::Ok().json(LookupResponse::from(updated)))
}

/// DELETE /catalog/{kind}/{id}
///
/// Soft delete: the entry stops being listed or referenced by new rows, but
/// existing products and orders keep pointing at it.
#[utoipa::path(
    delete,
    path = "/catalog/{kind}/{id}",
    params(
        ("kind" = LookupKind, Path, description = "Kind of reference data"),
        ("id" = i32, Path, description = "Entry id"),
        ("actorId" = Option<i32>, Query, description = "Who is deleting"),
    ),
    responses(
        (status = 204, description = "Entry deactivated"),
        (status = 404, description = "No active entry of this kind with that id"),
    ),
    tag = "catalog"
)]
pub async fn delete_lookup(
    state: web::Data<AppState>,
    path: web::Path<(LookupKind, i32)>,
    query: web::Query<ActorParams>,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let actor_id = query.actor_id;

    blocking(&state, move |s| s.catalog.delete_lookup(kind, id, actor_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
