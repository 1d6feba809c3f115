pub mod configuration;
pub mod lookup;
pub mod start;
pub mod status;
pub mod stop;
