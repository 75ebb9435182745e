mod handler;
mod model;

pub use handler::create_session;
pub use model::{CartItem, CreateSessionRequest};
