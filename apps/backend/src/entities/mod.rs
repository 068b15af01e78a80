pub mod blog_posts;
pub mod user_credentials;
pub mod user_permissions;
pub mod users;
