pub mod error;
pub mod extract;
pub mod locale;
pub mod response;
