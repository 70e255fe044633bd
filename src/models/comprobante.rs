use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ErrorValidacion;

/// Codigos de tipo de comprobante (tabla 3 de la ficha tecnica SRI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoComprobante {
    Factura,
    LiquidacionCompra,
    NotaCredito,
    NotaDebito,
    GuiaRemision,
    Retencion,
}

impl TipoComprobante {
    pub fn codigo(&self) -> &'static str {
        match self {
            Self::Factura => "01",
            Self::LiquidacionCompra => "03",
            Self::NotaCredito => "04",
            Self::NotaDebito => "05",
            Self::GuiaRemision => "06",
            Self::Retencion => "07",
        }
    }

    pub fn desde_codigo(codigo: &str) -> Result<Self, ErrorValidacion> {
        match codigo {
            "01" => Ok(Self::Factura),
            "03" => Ok(Self::LiquidacionCompra),
            "04" => Ok(Self::NotaCredito),
            "05" => Ok(Self::NotaDebito),
            "06" => Ok(Self::GuiaRemision),
            "07" => Ok(Self::Retencion),
            otro => Err(ErrorValidacion::TipoComprobanteDesconocido(otro.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ambiente {
    #[default]
    Pruebas,
    Produccion,
}

impl Ambiente {
    pub fn codigo(&self) -> &'static str {
        match self {
            Self::Pruebas => "1",
            Self::Produccion => "2",
        }
    }

    pub fn desde_codigo(codigo: &str) -> Result<Self, ErrorValidacion> {
        match codigo {
            "1" => Ok(Self::Pruebas),
            "2" => Ok(Self::Produccion),
            otro => Err(ErrorValidacion::AmbienteDesconocido(otro.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TipoEmision {
    #[default]
    Normal,
}

impl TipoEmision {
    pub fn codigo(&self) -> &'static str {
        match self {
            Self::Normal => "1",
        }
    }
}

fn tipo_emision_normal() -> String {
    TipoEmision::Normal.codigo().to_string()
}

/// Campos de cabecera con los que se arma la clave de acceso.
///
/// Todos los campos son explicitos: nada se toma del contexto del negocio
/// activo. Los codigos se guardan como texto y se validan al generar la clave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentidadDocumento {
    pub fecha_emision: NaiveDate,
    pub tipo_comprobante: String, // "01" factura, "04" nota credito
    pub ruc: String,              // 13 digitos
    pub ambiente: String,         // "1" pruebas, "2" produccion
    pub establecimiento: String,  // 3 digitos
    pub punto_emision: String,    // 3 digitos
    pub secuencial: u64,          // 1..=999999999
    pub codigo_numerico: String,  // 8 digitos
    #[serde(default = "tipo_emision_normal")]
    pub tipo_emision: String,
}

/// Parte numerica de un numero de documento. Puede venir como entero
/// (secuencial) o como texto libre ingresado por el usuario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumeroDocumento {
    Entero(u64),
    Texto(String),
}

impl From<u64> for NumeroDocumento {
    fn from(n: u64) -> Self {
        Self::Entero(n)
    }
}

impl From<u32> for NumeroDocumento {
    fn from(n: u32) -> Self {
        Self::Entero(u64::from(n))
    }
}

impl From<i32> for NumeroDocumento {
    fn from(n: i32) -> Self {
        match u64::try_from(n) {
            Ok(n) => Self::Entero(n),
            Err(_) => Self::Texto(n.to_string()),
        }
    }
}

impl From<&str> for NumeroDocumento {
    fn from(s: &str) -> Self {
        Self::Texto(s.to_string())
    }
}

impl From<String> for NumeroDocumento {
    fn from(s: String) -> Self {
        Self::Texto(s)
    }
}
