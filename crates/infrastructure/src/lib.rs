pub mod db;
pub mod models;
pub mod todo_service;

pub use db::*;
pub use models::*;
pub use todo_service::*;
