use crate::error::{validar_digitos, ErrorValidacion};
use crate::models::NumeroDocumento;
use crate::sri::clave_acceso::SECUENCIAL_MAXIMO;

/// Ancho al que se rellena con ceros el numero de documento interno.
pub const ANCHO_NUMERO_DOCUMENTO: usize = 8;

/// Formatea el numero de un documento como `SERIE-00000042`.
///
/// Si el numero es puramente numerico se rellena con ceros a la izquierda
/// hasta 8 digitos; si trae letras u otros simbolos se deja igual. Sin serie
/// se devuelve solo el numero. Con `exigir_serie` (ventas) la serie es
/// obligatoria; las compras la dejan opcional.
pub fn formatear_numero_documento(
    serie: Option<&str>,
    numero: impl Into<NumeroDocumento>,
    exigir_serie: bool,
) -> Result<String, ErrorValidacion> {
    let numero = match numero.into() {
        NumeroDocumento::Entero(n) => format!("{:0>ancho$}", n, ancho = ANCHO_NUMERO_DOCUMENTO),
        NumeroDocumento::Texto(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{:0>ancho$}", s, ancho = ANCHO_NUMERO_DOCUMENTO)
        }
        NumeroDocumento::Texto(s) => s,
    };

    match serie.filter(|s| !s.is_empty()) {
        Some(serie) => Ok(format!("{}-{}", serie, numero)),
        None if exigir_serie => {
            tracing::warn!(numero = %numero, "documento sin serie");
            Err(ErrorValidacion::SerieRequerida)
        }
        None => Ok(numero),
    }
}

/// Numero impreso de un comprobante SRI: `001-002-000000123`.
pub fn formatear_numero_sri(
    establecimiento: &str,
    punto_emision: &str,
    secuencial: u64,
) -> Result<String, ErrorValidacion> {
    validar_digitos("establecimiento", establecimiento, 3)?;
    validar_digitos("punto_emision", punto_emision, 3)?;
    if secuencial == 0 || secuencial > SECUENCIAL_MAXIMO {
        return Err(ErrorValidacion::SecuencialFueraDeRango(secuencial));
    }
    Ok(format!("{}-{}-{:09}", establecimiento, punto_emision, secuencial))
}

/// Numero de nota de venta interna (sin autorizacion SRI): `NV-000000001`.
pub fn formatear_numero_nota_venta(secuencial: u64) -> String {
    format!("NV-{:09}", secuencial)
}
