//! Business logic services layer

pub mod auth_service;
pub mod message_service;
pub mod profile_service;
pub mod site_service;

pub use auth_service::AuthService;
pub use message_service::MessageService;
pub use profile_service::{AvatarKind, ProfileService};
pub use site_service::SiteService;
