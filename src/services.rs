pub mod auth;
pub mod customer_service;
pub use customer_service::CustomerService;
pub mod inbox_service;
pub use inbox_service::InboxService;
pub mod lead_service;
pub use lead_service::LeadService;
