pub mod billing;
pub mod catalog;
pub mod follows;
pub mod library;
pub mod notifications;
pub mod playlists;
pub mod profile;
pub mod search;
pub mod support;
pub mod uploads;
