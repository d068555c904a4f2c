pub mod args;
pub mod errors;
pub mod space;
pub mod task;

pub use args::*;
pub use errors::*;
pub use space::*;
pub use task::*;
