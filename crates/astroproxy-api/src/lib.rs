// astroproxy-api: Async Rust client for the AstroProxy proxy-rental API

pub mod client;
pub mod error;
pub mod params;
pub mod transport;
pub mod types;

pub use client::{API_PREFIX, AstroProxyClient, ClientConfig, DEFAULT_BASE_URL};
pub use error::Error;
pub use params::{ParamValue, Params, WireToken};
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    NetworkType, OrderDirection, OrderField, Ordering, PortSpec, PortUpdate, Rotation,
    RotationTimeUnit, RotationTrigger, TrafficMode, VpnClient,
};
