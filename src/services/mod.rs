pub mod billing;
pub mod moderation;
pub mod storage;
