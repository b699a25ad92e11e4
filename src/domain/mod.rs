pub mod catalog;
pub mod order;
pub mod qr;

pub use order::{Order, OrderItem, OrderStatus};
pub use qr::QrPayload;
