//! Order domain model and wire types shared by the order service and its clients.

pub mod domain;
pub mod error;
pub mod protocol;
pub mod validation;
