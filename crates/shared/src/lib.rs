pub mod display;
pub mod domain;
