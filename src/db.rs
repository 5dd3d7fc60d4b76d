pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod inbox_repo;
pub use inbox_repo::InboxRepository;
