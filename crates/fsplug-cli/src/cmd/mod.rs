pub mod fs;
pub mod search;
