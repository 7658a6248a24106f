pub mod output;
pub mod pdf;
pub mod url;
