//! Filesystem adapters.

mod cap_std_store;

pub use cap_std_store::CapStdFileStore;
