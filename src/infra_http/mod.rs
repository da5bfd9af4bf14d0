mod redirect_nav;
mod transport_reqwest;

pub use redirect_nav::*;
pub use transport_reqwest::*;
