pub mod alarm;
pub mod config;
pub mod format;
pub mod reminder;
