use thiserror::Error;

/// Errores de validacion de los campos de un comprobante.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorValidacion {
    #[error("{campo}: se esperaban {esperado} digitos, se recibieron {recibido}")]
    AnchoInvalido {
        campo: &'static str,
        esperado: usize,
        recibido: usize,
    },

    #[error("{campo}: solo se permiten digitos")]
    NoNumerico { campo: &'static str },

    #[error("secuencial fuera de rango (1..=999999999): {0}")]
    SecuencialFueraDeRango(u64),

    #[error("Formato de fecha invalido: {0}")]
    FechaInvalida(String),

    #[error("digito verificador invalido: esperado {esperado}, recibido {recibido}")]
    DigitoVerificadorInvalido { esperado: u32, recibido: u32 },

    #[error("El documento requiere serie")]
    SerieRequerida,

    #[error("ambiente desconocido: {0}")]
    AmbienteDesconocido(String),

    #[error("tipo de comprobante desconocido: {0}")]
    TipoComprobanteDesconocido(String),
}

impl ErrorValidacion {
    /// Nombre del campo que provoco el error, si aplica.
    pub fn campo(&self) -> Option<&'static str> {
        match self {
            Self::AnchoInvalido { campo, .. } | Self::NoNumerico { campo } => Some(campo),
            Self::SecuencialFueraDeRango(_) => Some("secuencial"),
            Self::FechaInvalida(_) => Some("fecha_emision"),
            Self::DigitoVerificadorInvalido { .. } => Some("digito_verificador"),
            Self::SerieRequerida => Some("serie"),
            Self::AmbienteDesconocido(_) => Some("ambiente"),
            Self::TipoComprobanteDesconocido(_) => Some("tipo_comprobante"),
        }
    }
}

/// Verifica que `valor` tenga exactamente `ancho` digitos ASCII.
pub(crate) fn validar_digitos(
    campo: &'static str,
    valor: &str,
    ancho: usize,
) -> Result<(), ErrorValidacion> {
    let recibido = valor.chars().count();
    if recibido != ancho {
        return Err(ErrorValidacion::AnchoInvalido {
            campo,
            esperado: ancho,
            recibido,
        });
    }
    if !valor.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorValidacion::NoNumerico { campo });
    }
    Ok(())
}
