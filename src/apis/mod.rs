pub mod object;
pub mod port;
pub mod queue;
pub mod router;
pub mod static_large_object;

// Re-export all APIs
pub use object::{ObjectApi, ObjectListOptions};
pub use port::PortApi;
pub use queue::QueueApi;
pub use router::RouterApi;
pub use static_large_object::StaticLargeObjectApi;
