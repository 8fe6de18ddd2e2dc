pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod method_not_allowed;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use method_not_allowed::method_not_allowed_handler;
