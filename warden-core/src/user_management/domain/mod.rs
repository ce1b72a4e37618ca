pub mod aggregates;
pub mod repositories;
pub mod validation;
pub mod value_objects;

pub use aggregates::*;
pub use repositories::*;
pub use validation::*;
pub use value_objects::*;
