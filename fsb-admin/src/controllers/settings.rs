use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AdminError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub value: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/settings").route(web::get().to(list_settings)))
        .service(web::resource("/api/settings/{key}").route(web::put().to(update_setting)));
}

async fn list_settings(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let settings = state.registry.list_settings()?;
    Ok(HttpResponse::Ok().json(settings))
}

async fn update_setting(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateSettingRequest>,
) -> Result<HttpResponse, AdminError> {
    state.access.authorize(&req)?;

    let key = path.into_inner();
    let setting = state.registry.update_setting(&key, &body.value)?;
    log::info!("Setting {} updated", setting.key);
    Ok(HttpResponse::Ok().json(setting))
}

#[cfg(test)]
mod tests {
    use crate::middleware::AccessPolicy;
    use crate::models::Setting;
    use crate::test_support::{routes, test_state};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;

    #[actix_web::test]
    async fn test_defaults_then_update() {
        let (state, _) = test_state(AccessPolicy::Open);
        let app = test::init_service(App::new().app_data(state).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let settings: Vec<Setting> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            settings,
            vec![
                Setting { key: "cache_time_minutes".into(), value: "15".into() },
                Setting { key: "max_cache_size_gb".into(), value: "10".into() },
                Setting { key: "max_file_size_mb".into(), value: "100".into() },
            ]
        );

        let req = test::TestRequest::put()
            .uri("/api/settings/cache_time_minutes")
            .set_json(json!({"value": "45"}))
            .to_request();
        let updated: Setting = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated.value, "45");

        let req = test::TestRequest::put()
            .uri("/api/settings/cache_time_minutes")
            .set_json(json!({"wrong": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
