use crate::{
    api::{activity, attendance, block, login, room, student},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    // Public routes
    cfg.service(
        web::resource("/login")
            .wrap(login_limiter)
            .route(web::post().to(login::login)),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/toggle")
                            .route(web::post().to(attendance::toggle_attendance)),
                    )
                    .service(
                        web::resource("/status/{student_id}")
                            .route(web::get().to(attendance::attendance_status)),
                    )
                    .service(web::resource("/sweep").route(web::post().to(attendance::run_sweep))),
            )
            .service(
                web::scope("/blocks")
                    .service(
                        web::resource("")
                            .route(web::get().to(block::list_blocks))
                            .route(web::post().to(block::create_block)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(block::delete_block))),
            )
            .service(
                web::scope("/rooms")
                    .service(web::resource("").route(web::post().to(room::create_room)))
                    .service(web::resource("/{id}").route(web::delete().to(room::delete_room))),
            )
            .service(
                web::scope("/students")
                    .service(web::resource("").route(web::post().to(student::create_student)))
                    .service(
                        web::resource("/{id}").route(web::delete().to(student::delete_student)),
                    ),
            )
            // Profile keeps the singular path the frontend calls.
            .service(
                web::resource("/student/{id}").route(web::get().to(student::student_profile)),
            )
            .service(
                web::scope("/activities")
                    .service(
                        web::resource("")
                            .route(web::get().to(activity::list_activities))
                            .route(web::post().to(activity::create_activity)),
                    )
                    .service(
                        web::resource("/{id}").route(web::delete().to(activity::delete_activity)),
                    ),
            ),
    );
}
