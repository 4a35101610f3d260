//! Offline cache gateway: decides per request whether to answer from the
//! active cache generation or from the network.

mod policy;
mod request;
mod service;

pub use policy::ResourceClass;
pub use request::{GatewayRequest, GatewayResponse, Method, ResponseSource};
pub use service::{GatewayState, OfflineGateway};
