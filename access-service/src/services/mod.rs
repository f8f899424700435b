pub mod access_store;
pub mod identity;

pub use access_store::{AccessStore, MockAccessStore, PgAccessStore};
pub use identity::{
    HttpIdentityClient, IdentityClient, IdentityError, IdentityProfile, MockIdentityClient,
    Session,
};
