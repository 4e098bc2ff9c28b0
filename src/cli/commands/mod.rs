pub mod add;
pub mod buy;
pub mod create_user;
pub mod delete_user;
pub mod holding;
pub mod holdings;
pub mod init;
pub mod nav;
pub mod remove;
pub mod sell;
pub mod users;
