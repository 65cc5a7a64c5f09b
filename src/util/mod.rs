pub mod seed;
#[cfg(feature = "tracing")]
pub mod trace;
