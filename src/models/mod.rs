pub mod account;
pub mod application;
pub mod assessment;
pub mod employee;
pub mod interview;
pub mod job;
pub mod offer;
