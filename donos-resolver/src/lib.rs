#[cfg(feature = "mock")]
pub mod mock;
pub mod prelude;
pub mod remote;

pub use remote::RemoteResolver;
