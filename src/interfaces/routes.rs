use actix_web::web;

mod contact;
mod json_error;
mod projects;
mod system;

pub use json_error::JsonError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(projects::config_routes)
            .configure(contact::config_routes)
            .configure(system::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
