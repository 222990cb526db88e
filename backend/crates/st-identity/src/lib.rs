pub mod error;
pub mod identity_store;
pub mod load_result;
pub mod stored_identity;


pub use error::{IdentityError, Result as IdentityResult};
pub use identity_store::IdentityStore;
pub use load_result::LoadResult;
pub use stored_identity::{SCHEMA_VERSION, StoredIdentity};
