pub mod customers;
pub mod health;
pub mod inbox;
pub mod leads;
