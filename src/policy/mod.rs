//! Pure decision logic: who may do what, and how application status moves.
//!
//! Nothing in here touches storage or the request; services call into it
//! before and after persisting changes.

pub mod access;
pub mod lifecycle;
