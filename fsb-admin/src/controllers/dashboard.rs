use actix_files::NamedFile;
use actix_web::web;

use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["/admin", "/admin/"]).route(web::get().to(admin_page)));
}

async fn admin_page(state: web::Data<AppState>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(state.static_dir.join("index.html"))?)
}
