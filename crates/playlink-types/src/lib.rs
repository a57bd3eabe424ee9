pub mod api;
pub mod duration;
