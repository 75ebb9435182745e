mod handler;
mod model;

pub use handler::{check_session, login};
pub use model::{LoginRequest, LoginResponse, SessionResponse};
