//! Business flows that span more than one repository.

pub mod auth;
pub mod uploads;
