pub mod customer;
pub mod inbox;
pub mod lead;
