// Route exports
pub mod prediction;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(prediction::configure),
    );
}
