pub mod app_builder;
pub mod auth;
pub mod logging;

// Re-export only what current tests actually import
pub use app_builder::create_test_app;
