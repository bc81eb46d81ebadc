use actix_web::{web, HttpRequest, HttpResponse};

use crate::error::AdminError;
use crate::models::NewBot;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/bots")
            .route(web::get().to(list_bots))
            .route(web::post().to(add_bot)),
    );
}

async fn list_bots(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let bots = state.registry.list_bots()?;
    Ok(HttpResponse::Ok().json(bots))
}

async fn add_bot(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewBot>,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let bot = state.registry.add_bot(body.into_inner())?;
    Ok(HttpResponse::Ok().json(bot))
}
