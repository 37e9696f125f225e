pub mod bounds;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod synthetic;
pub mod types;

pub use types::{Assignments, Float, Matrix};

pub use error::{KMeansError, Result};

pub use bounds::BoundingBox;
