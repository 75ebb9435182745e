mod handler;
mod model;

pub use handler::{create_pix, payment_status};
pub use model::{CreatePixRequest, PaymentStatusRequest};
