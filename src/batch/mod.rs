pub mod driver;
pub mod sink;
