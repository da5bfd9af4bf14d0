mod redirect;
mod session_store;
mod transport;

pub use redirect::*;
pub use session_store::*;
pub use transport::*;
