pub mod directory;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

pub use store::Store;
