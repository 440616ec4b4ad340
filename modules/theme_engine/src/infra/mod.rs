//! Infrastructure layer - database storage, theme packages and theme files

pub mod files;
pub mod packages;
pub mod storage;
