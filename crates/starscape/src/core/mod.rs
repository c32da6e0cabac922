pub mod driver;
pub mod resources;
pub mod time;
