pub mod classifier;
pub mod entities;
pub mod ingredients;
pub mod merger;
pub mod nutrition;
pub mod ports;
pub mod schema;
pub mod services;
pub mod value_objects;
pub mod vision;

pub use entities::*;
pub use ports::*;
pub use value_objects::*;
