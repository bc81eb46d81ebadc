use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AdminError;
use crate::models::FilePage;
use crate::AppState;

/// Raw pagination parameters; non-numeric values fall back to defaults
#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/files").route(web::get().to(list_files)));
}

async fn list_files(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ListFilesQuery>,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let page = FilePage::from_query(query.limit.as_deref(), query.offset.as_deref());
    let files = state.registry.list_files(page)?;
    Ok(HttpResponse::Ok().json(files))
}
