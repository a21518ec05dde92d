pub mod bar;
pub mod request;
