pub mod notification_repo;
pub mod post_repo;
pub mod report_repo;
pub mod settlement;
pub mod user_repo;

pub use notification_repo::NotificationRepo;
pub use post_repo::PostRepo;
pub use report_repo::ReportRepo;
pub use settlement::SettlementRepo;
pub use user_repo::UserRepo;
