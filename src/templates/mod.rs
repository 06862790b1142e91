pub mod layouts;
pub mod pages;
