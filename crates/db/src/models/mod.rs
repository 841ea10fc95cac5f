pub mod notification;
pub mod post;
pub mod report;
pub mod user;
