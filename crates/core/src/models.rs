pub mod booking;
pub mod chat;
pub mod notification;
pub mod user;
