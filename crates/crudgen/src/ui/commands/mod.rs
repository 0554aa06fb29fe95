pub mod generate;
pub mod list;
pub mod reconcile;

pub use generate::{GenerateConfig, generate_modules};
pub use list::list_endpoints;
pub use reconcile::reconcile_stubs;
