pub mod filter;
pub mod question;
pub mod response_code;
