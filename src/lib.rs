pub mod components;
pub mod config;
pub mod courses;
pub mod extract;
pub mod grading;
pub mod output;
pub mod session;
