pub mod credentials;
pub mod principal;

pub use credentials::{LoginCredentials, ProfileCompletionData, RegisterCredentials};
pub use principal::{Email, Principal, Role, UserProfile};
