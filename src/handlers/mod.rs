pub mod health_handler;
pub mod question_handler;

use actix_web::{guard, http::header, web};

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use question_handler::{generate_questions_json, generate_questions_multipart};

use crate::errors::AppError;

/// Body limit for JSON requests; typed context can be as large as an upload.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

const GENERATE_PATHS: [&str; 2] = ["/generate-question", "/generate-questions"];

fn is_json(ctx: &guard::GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().to_lowercase().starts_with("application/json"))
}

fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            AppError::InputError(format!("Body JSON tidak valid: {}", err)).into()
        })
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config(JSON_BODY_LIMIT));

    // JSON bodies go to the JSON handler, everything else is read as a form.
    for path in GENERATE_PATHS {
        cfg.service(
            web::resource(path)
                .route(
                    web::post()
                        .guard(guard::fn_guard(is_json))
                        .to(generate_questions_json),
                )
                .route(web::post().to(generate_questions_multipart)),
        );
    }

    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready);
}
