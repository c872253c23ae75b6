pub mod page_formatter;

pub use page_formatter::PageFormatter;
