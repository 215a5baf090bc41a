// exported modules
pub mod error;
pub mod http;
pub mod model;

// client impls
pub mod codeforces;

// re-exports
pub use codeforces::CodeforcesClient;
pub use error::*;
pub use model::*;
