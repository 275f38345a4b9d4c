pub mod model;

pub use model::{Artifact, Distribution, Module, ModuleType, Server};
