#![forbid(unsafe_code)]

mod model;
mod pair;
mod state;

pub use model::*;
pub use pair::*;
pub use state::*;
