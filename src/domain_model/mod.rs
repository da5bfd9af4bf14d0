mod request;
mod role;
mod session;
mod token;

pub use request::*;
pub use role::*;
pub use session::*;
pub use token::*;
