pub mod display_terminal;
pub mod format_utils;
pub mod string_utils;
