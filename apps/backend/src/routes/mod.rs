use actix_web::web;

pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

/// Configure application routes for both tests and the server binary.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check route: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    // User routes: /api/users/**
    cfg.service(web::scope("/api/users").configure(users::configure_routes));

    // Post routes: /api/posts/**
    cfg.service(web::scope("/api/posts").configure(posts::configure_routes));
}
