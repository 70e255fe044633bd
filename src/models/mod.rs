pub mod comprobante;

pub use comprobante::*;
