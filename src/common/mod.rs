pub mod buffered;
pub mod error;
pub mod response;
pub mod upload;
