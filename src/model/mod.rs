pub mod alphabet;
mod pore_model;
mod registry;
mod state;

pub use pore_model::{PoreModel, ScaledModel};
pub use registry::ModelRegistry;
pub use state::{GaussianParameters, StateParams};
