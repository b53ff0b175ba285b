pub mod errors;
pub mod report;
pub mod state;

pub use errors::*;
pub use report::*;
pub use state::*;
