// Domain layer: row models, provider objects and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod stripe;
