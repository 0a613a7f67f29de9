pub mod model;
pub mod repository;
pub mod service;

pub use model::{ManagementProvisioning, WorkspaceMember};
pub use repository::ManagementRepository;
pub use service::{MagicLinkDelivery, ManagementInterface, MessagingClient, WorkspaceDirectory};
