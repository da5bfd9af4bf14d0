mod gate_client;
mod redirect_fake;
mod refresh_coordinator;
mod restoration;
mod session_store_fake;
mod transport_fake;

pub use gate_client::*;
pub use redirect_fake::*;
pub use refresh_coordinator::*;
pub use restoration::*;
pub use session_store_fake::*;
pub use transport_fake::*;
