use actix_web::{HttpResponse, web};

use crate::handlers;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/register").route(web::post().to(handlers::auth::register)))
            .service(web::resource("/login").route(web::post().to(handlers::auth::login))),
    )
    .service(
        web::scope("/funds")
            // Registered before `/{id}` so "donors" is never taken for a fund id.
            .service(
                web::resource("/donors/{id}").route(web::get().to(handlers::donations::donors)),
            )
            .service(
                web::resource("")
                    .route(web::get().to(handlers::funds::all))
                    .route(web::post().to(handlers::funds::create))
                    .route(web::head().to(HttpResponse::MethodNotAllowed)),
            )
            .service(web::resource("/{id}").route(web::get().to(handlers::funds::get_fund))),
    )
    .service(web::resource("/donations").route(web::post().to(handlers::donations::create)));
}
