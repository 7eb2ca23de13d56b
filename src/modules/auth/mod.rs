//! Bearer-token identity. Issuing tokens and user management live in another
//! service; this crate only needs to validate them.

pub mod dto;
pub mod service;
