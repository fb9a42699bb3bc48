pub mod form;
pub mod render;
pub mod terminal;

pub use terminal::TerminalView;
