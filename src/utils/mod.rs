pub mod crypto;
pub mod extract;
pub mod token;
pub mod validation;
