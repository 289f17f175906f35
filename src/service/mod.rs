pub mod image_store;
pub mod mailer;
pub mod password;
pub mod session;
