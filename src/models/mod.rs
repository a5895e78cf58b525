pub mod assignment;
pub mod entry;
pub mod event;
pub mod sheet;
