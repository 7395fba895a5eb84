mod auth;
mod records;
mod store;

pub use auth::TokenManager;
pub use auth::basic_auth_header;
pub use auth::is_expired;
pub use records::Record;
pub use store::STORED_TABLES;
pub use store::Store;
pub use store::StoreError;
