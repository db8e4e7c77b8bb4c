#[cfg(feature = "ac")]
pub mod ac;
pub mod core;
pub mod fixture;
#[cfg(feature = "sqlite")]
pub mod sqlite;
