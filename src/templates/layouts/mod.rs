pub mod base;

pub use base::base_layout;
