pub mod cleanup;
pub mod color;
pub mod dispatch;
pub mod session;
