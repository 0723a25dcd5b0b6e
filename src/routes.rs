use crate::{
    api::{attendance, department, employee},
    error::ApiError,
};
use actix_cors::Cors;
use actix_web::{http::header, web};
use tracing::warn;

/// Cross-origin policy for the browser front end.
pub fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PATCH", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .supports_credentials()
        .max_age(12 * 60 * 60)
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    // Extractor failures use the same error envelope as the handlers
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected request body");
        ApiError::validation("Invalid input format").into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected query string");
        ApiError::validation("Invalid input format").into()
    });
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        warn!(error = %err, "Rejected path parameter");
        ApiError::not_found("Not Found").into()
    });

    cfg.service(
        web::scope(api_prefix)
            .app_data(json_config)
            .app_data(query_config)
            .app_data(path_config)
            // /employees
            .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
            // /employee
            .service(web::resource("/employee").route(web::post().to(employee::create_employee)))
            // /employee/{id}
            .service(
                web::resource("/employee/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::patch().to(employee::update_employee))
                    .route(web::delete().to(employee::delete_employee)),
            )
            // /departements
            .service(
                web::resource("/departements").route(web::get().to(department::list_departments)),
            )
            // /departement
            .service(
                web::resource("/departement").route(web::post().to(department::create_department)),
            )
            // /departement/{id}
            .service(
                web::resource("/departement/{id}")
                    .route(web::get().to(department::get_department))
                    .route(web::patch().to(department::update_department))
                    .route(web::delete().to(department::delete_department)),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(web::resource("").route(web::post().to(attendance::clock_in)))
                    // /attendance/logs, ahead of /attendance/{id}
                    .service(web::resource("/logs").route(web::get().to(attendance::list_logs)))
                    // /attendance/{id}
                    .service(web::resource("/{id}").route(web::put().to(attendance::clock_out))),
            ),
    );
}
