//! Domain records for the ads board and the field rules that guard them.

pub mod errors;
pub mod validation;
pub mod ad;
pub mod user;

pub use ad::{validate_ad_fields, Ad};
pub use user::{validate_user_fields, User};
