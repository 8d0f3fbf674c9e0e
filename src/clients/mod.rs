//! Domain-specific clients for the three partner services.
//!
//! Each wraps [`crate::http::ResilientJsonClient`] with a fixed endpoint
//! path and validates its input before anything goes over the network.

pub mod address;
pub mod inventory;
pub mod region;

pub use address::AddressClient;
pub use inventory::InventoryClient;
pub use region::RegionClient;
