pub mod add;
pub mod delete;
pub mod export;
pub mod init;
pub mod list;
pub mod misc;
pub mod show;
pub mod templates;
