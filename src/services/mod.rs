mod controller;
mod repository;

pub use controller::*;
pub use repository::*;
