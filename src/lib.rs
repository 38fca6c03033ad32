#![forbid(unsafe_code)]

pub mod cli;
pub mod date;
pub mod download;
pub mod entry;
pub mod error;
pub mod fetch;
pub mod html;
pub mod layout;
pub mod listing;
pub mod logging;
pub mod pagination;
pub mod site;
