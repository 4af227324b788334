//! Post-image upload route.

use actix_web::{HttpResponse, web};

use amigo_infra::storage::IntakeError;
use amigo_shared::dto::UploadImageResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/images - compress the raw upload and store it, returning the
/// public URL the composer puts into the block's settings.
pub async fn upload_image(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let url = state.intake.upload(&body).await.map_err(|e| match e {
        IntakeError::Codec(msg) => AppError::BadRequest(msg),
        IntakeError::Storage(err) => AppError::Internal(err.to_string()),
    })?;
    Ok(HttpResponse::Created().json(UploadImageResponse { url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::handlers::configure_routes;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    fn config() -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            storage_base_url: "https://storage.test".into(),
            json_logs: false,
        }
    }

    #[actix_web::test]
    async fn undecodable_upload_is_a_bad_request() {
        let state = AppState::new(&config()).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/images")
            .set_payload(&b"not an image"[..])
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
