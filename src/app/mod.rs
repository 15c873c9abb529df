// Presentation layer: 終端機輸入、進度顯示、輸出與匯出

pub mod progress;
pub mod terminal;

pub use progress::TerminalProgress;
pub use terminal::TerminalSession;
