//! Clave de acceso y numeracion de comprobantes electronicos del SRI.

pub mod config;
pub mod error;
pub mod models;
pub mod sri;

pub use config::{fecha_desde_bd, ConfigEmisor};
pub use error::ErrorValidacion;
pub use models::{Ambiente, IdentidadDocumento, NumeroDocumento, TipoComprobante, TipoEmision};
pub use sri::*;
