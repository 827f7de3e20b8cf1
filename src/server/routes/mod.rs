// HTTP routes
pub mod health;
pub mod post;

pub use health::*;
pub use post::*;
