pub mod chip;
pub mod goal;
pub mod tshirt;
pub mod user;
