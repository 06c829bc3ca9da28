pub mod controls;
pub mod format;
pub mod menu;
pub mod shortcuts;
