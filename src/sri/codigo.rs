use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{validar_digitos, ErrorValidacion};

/// Codigo numerico de 8 digitos (posiciones 40-47 de la clave de acceso).
///
/// Debe ser distinto por comprobante; dos documentos con la misma fecha,
/// serie y secuencial solo se distinguen por este codigo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CodigoNumerico(String);

impl CodigoNumerico {
    /// Valida un codigo entregado por quien emite.
    pub fn nuevo(codigo: &str) -> Result<Self, ErrorValidacion> {
        validar_digitos("codigo_numerico", codigo, 8)?;
        Ok(Self(codigo.to_string()))
    }

    /// Genera un codigo aleatorio con el generador del hilo actual.
    pub fn aleatorio() -> Self {
        let mut rng = rand::thread_rng();
        Self::con_rng(&mut rng)
    }

    pub fn con_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let codigo: u32 = rng.gen_range(10_000_000..=99_999_999);
        Self(format!("{:08}", codigo))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<CodigoNumerico> for String {
    fn from(codigo: CodigoNumerico) -> Self {
        codigo.0
    }
}

impl TryFrom<String> for CodigoNumerico {
    type Error = ErrorValidacion;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::nuevo(&s)
    }
}
