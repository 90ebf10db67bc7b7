pub mod errors;
pub mod fragment;
pub mod payload;
pub mod ports;
pub mod template;
