mod bridge_contact_repository;
mod traits;

pub use bridge_contact_repository::BridgeContactRepository;
pub use traits::ContactRepository;
