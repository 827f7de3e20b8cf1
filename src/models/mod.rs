pub mod post;
pub mod reddit;
