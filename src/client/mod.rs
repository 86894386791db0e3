pub mod error;
pub mod lms_client;
