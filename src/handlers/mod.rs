pub mod auth;
pub mod category;
pub mod contact;
pub mod inclusion;
pub mod package;
pub mod storefront;
