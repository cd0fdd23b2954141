// Domain layer: resource descriptors and ports. No HTTP server types here.

pub mod model;
pub mod ports;
