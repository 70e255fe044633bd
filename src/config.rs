use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{validar_digitos, ErrorValidacion};
use crate::models::{Ambiente, IdentidadDocumento, TipoComprobante, TipoEmision};
use crate::sri::codigo::CodigoNumerico;

/// Datos del emisor necesarios para numerar comprobantes.
///
/// Se leen una vez de la tabla `config` y desde ahi viajan como parametros;
/// ninguna funcion de numeracion consulta el negocio activo por su cuenta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEmisor {
    pub ruc: String,
    #[serde(default)]
    pub ambiente: Ambiente,
    pub establecimiento: String,
    pub punto_emision: String,
}

impl ConfigEmisor {
    /// Construye la configuracion desde los pares clave/valor de la tabla `config`.
    ///
    /// `sri_ambiente = "produccion"` selecciona produccion; cualquier otro
    /// valor (o su ausencia) deja el ambiente de pruebas.
    pub fn desde_mapa(config: &HashMap<String, String>) -> Result<Self, ErrorValidacion> {
        let cfg = |key: &str| -> String { config.get(key).map(|v| v.trim().to_string()).unwrap_or_default() };

        let ambiente = match cfg("sri_ambiente").as_str() {
            "produccion" => Ambiente::Produccion,
            _ => Ambiente::Pruebas, // pruebas por defecto
        };

        let emisor = ConfigEmisor {
            ruc: cfg("ruc"),
            ambiente,
            establecimiento: cfg("establecimiento"),
            punto_emision: cfg("punto_emision"),
        };
        emisor.validar()?;

        tracing::debug!(
            ruc = %emisor.ruc,
            ambiente = emisor.ambiente.codigo(),
            "configuracion de emisor cargada"
        );
        Ok(emisor)
    }

    pub fn validar(&self) -> Result<(), ErrorValidacion> {
        validar_digitos("ruc", &self.ruc, 13)?;
        validar_digitos("establecimiento", &self.establecimiento, 3)?;
        validar_digitos("punto_emision", &self.punto_emision, 3)?;
        Ok(())
    }

    /// Arma la identidad completa de un comprobante de este emisor.
    pub fn identidad(
        &self,
        tipo: TipoComprobante,
        fecha_emision: NaiveDate,
        secuencial: u64,
        codigo: &CodigoNumerico,
    ) -> IdentidadDocumento {
        IdentidadDocumento {
            fecha_emision,
            tipo_comprobante: tipo.codigo().to_string(),
            ruc: self.ruc.clone(),
            ambiente: self.ambiente.codigo().to_string(),
            establecimiento: self.establecimiento.clone(),
            punto_emision: self.punto_emision.clone(),
            secuencial,
            codigo_numerico: codigo.as_str().to_string(),
            tipo_emision: TipoEmision::Normal.codigo().to_string(),
        }
    }

    /// Clave de la tabla `config` que guarda el proximo secuencial del tipo
    /// de comprobante. Pruebas y produccion llevan contadores separados.
    pub fn clave_secuencial(&self, tipo: TipoComprobante) -> String {
        let nombre = match tipo {
            TipoComprobante::Factura => "factura",
            TipoComprobante::LiquidacionCompra => "liquidacion_compra",
            TipoComprobante::NotaCredito => "nota_credito",
            TipoComprobante::NotaDebito => "nota_debito",
            TipoComprobante::GuiaRemision => "guia_remision",
            TipoComprobante::Retencion => "retencion",
        };
        match self.ambiente {
            Ambiente::Pruebas => format!("secuencial_{}_pruebas", nombre),
            Ambiente::Produccion => format!("secuencial_{}", nombre),
        }
    }
}

/// Convierte la fecha guardada en SQLite ("2026-02-11 15:30:00" o
/// "2026-02-11") a la fecha de emision.
pub fn fecha_desde_bd(fecha_bd: &str) -> Result<NaiveDate, ErrorValidacion> {
    let fecha_parte = fecha_bd.split(' ').next().unwrap_or(fecha_bd);
    NaiveDate::parse_from_str(fecha_parte, "%Y-%m-%d")
        .map_err(|_| ErrorValidacion::FechaInvalida(fecha_bd.to_string()))
}
