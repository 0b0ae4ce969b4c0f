//! Read-only inventory views: the aggregate join and the bulk export.

use actix_web::{get, web};

use crate::domain::{InventoryExport, OverviewRow};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::BearerSession;
use crate::inbound::http::state::HttpState;

/// Every key joined with every holder.
///
/// Keys nobody holds appear once with `quantity` 0 and null holder columns.
/// Rows are ordered by key id, then holder name with nulls last.
#[utoipa::path(
    get,
    path = "/over_all",
    responses(
        (status = 200, description = "Aggregate view", body = [OverviewRow]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["overview"],
    operation_id = "overAll"
)]
#[get("/over_all")]
pub async fn over_all(
    _session: BearerSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<OverviewRow>>> {
    let rows = state.overview.overview().await?;
    Ok(web::Json(rows))
}

/// Keys, users, assignments and the aggregate view in one document.
#[utoipa::path(
    get,
    path = "/export",
    responses(
        (status = 200, description = "Export bundle", body = InventoryExport),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Store failure", body = ErrorSchema)
    ),
    tags = ["overview"],
    operation_id = "exportInventory"
)]
#[get("/export")]
pub async fn export(
    _session: BearerSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<InventoryExport>> {
    let bundle = state.overview.export().await?;
    Ok(web::Json(bundle))
}
