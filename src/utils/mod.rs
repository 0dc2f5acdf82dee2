pub mod basic_auth;
pub mod hash;
pub mod html;
pub mod schema;
