pub mod client;
pub mod response;

pub use client::{read_document, SyllabusClient};
pub use response::{parse_extraction_response, parse_seed_records};
