use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AdminError;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/stats").route(web::get().to(get_stats)));
}

async fn get_stats(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let stats = state.registry.load_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}
