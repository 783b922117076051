pub mod crypto;
pub mod exchange_signature;
pub mod pagination;
pub mod time;
pub mod token;
