//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod notification;
mod role;
mod user;

pub use notification::{AdminNotice, Notification};
pub use role::{RoleCodeRegistry, RoleName, RoleState, RoleTransition};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, UserId, validate_password,
};
