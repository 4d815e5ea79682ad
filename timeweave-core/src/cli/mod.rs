pub mod conf;
pub mod show;
