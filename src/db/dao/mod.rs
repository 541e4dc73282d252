pub mod base;
pub mod base_traits;
pub mod category_dao;
mod context;
pub mod error;
pub mod todo_dao;
pub mod user_dao;

pub use base::{DaoBase, Page, Pages};
pub use base_traits::{HasIdActiveModel, HasOrderColumns, TimestampedActiveModel};
pub use category_dao::CategoryDao;
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use todo_dao::{TodoDao, TodoFields};
pub use user_dao::{Registration, UserDao};
