use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{validar_digitos, ErrorValidacion};
use crate::models::IdentidadDocumento;

/// Longitud de la clave sin el digito verificador.
pub const LONGITUD_BASE: usize = 48;
/// Longitud total de la clave de acceso.
pub const LONGITUD_CLAVE: usize = 49;
pub const SECUENCIAL_MAXIMO: u64 = 999_999_999;

/// Clave de acceso de 49 digitos de un comprobante electronico.
///
/// Solo se construye con [`generar_clave_acceso`] o [`verificar_clave_acceso`],
/// asi que toda instancia tiene el digito verificador correcto.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClaveAcceso(String);

impl ClaveAcceso {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digito_verificador(&self) -> u32 {
        u32::from(self.0.as_bytes()[LONGITUD_BASE] - b'0')
    }

    /// Descompone la clave en sus campos.
    pub fn componentes(&self) -> ComponentesClave {
        let c = &self.0;
        ComponentesClave {
            fecha_emision: fecha_desde_clave(&c[0..8])
                .unwrap_or_default(),
            tipo_comprobante: c[8..10].to_string(),
            ruc: c[10..23].to_string(),
            ambiente: c[23..24].to_string(),
            establecimiento: c[24..27].to_string(),
            punto_emision: c[27..30].to_string(),
            secuencial: c[30..39].parse().unwrap_or_default(),
            codigo_numerico: c[39..47].to_string(),
            tipo_emision: c[47..48].to_string(),
            digito_verificador: self.digito_verificador(),
        }
    }
}

impl fmt::Display for ClaveAcceso {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClaveAcceso {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ClaveAcceso> for String {
    fn from(clave: ClaveAcceso) -> Self {
        clave.0
    }
}

impl TryFrom<String> for ClaveAcceso {
    type Error = ErrorValidacion;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        verificar_clave_acceso(&s)
    }
}

impl FromStr for ClaveAcceso {
    type Err = ErrorValidacion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        verificar_clave_acceso(s)
    }
}

/// Campos recuperados de una clave de acceso existente.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentesClave {
    pub fecha_emision: NaiveDate,
    pub tipo_comprobante: String,
    pub ruc: String,
    pub ambiente: String,
    pub establecimiento: String,
    pub punto_emision: String,
    pub secuencial: u64,
    pub codigo_numerico: String,
    pub tipo_emision: String,
    pub digito_verificador: u32,
}

/// Genera la clave de acceso de 49 digitos para comprobantes electronicos SRI.
///
/// Estructura (48 digitos + 1 digito verificador):
/// - Posiciones 1-8:   fecha emision (ddmmyyyy)
/// - Posiciones 9-10:  codigo documento (01=factura, 04=nota credito)
/// - Posiciones 11-23: RUC emisor (13 digitos)
/// - Posicion 24:      ambiente (1=pruebas, 2=produccion)
/// - Posiciones 25-27: establecimiento (3 digitos)
/// - Posiciones 28-30: punto de emision (3 digitos)
/// - Posiciones 31-39: secuencial (9 digitos)
/// - Posiciones 40-47: codigo numerico (8 digitos)
/// - Posicion 48:      tipo emision (1=normal)
/// - Posicion 49:      digito verificador (modulo 11)
///
/// Cada campo se valida antes de concatenar; el error indica cual fallo.
pub fn generar_clave_acceso(doc: &IdentidadDocumento) -> Result<ClaveAcceso, ErrorValidacion> {
    let base = armar_base(doc).inspect_err(|e| {
        tracing::warn!(campo = e.campo(), error = %e, "clave de acceso rechazada");
    })?;

    let dv = digito_verificador_modulo11(&base);
    let clave = ClaveAcceso(format!("{}{}", base, dv));
    tracing::debug!(clave = %clave, secuencial = doc.secuencial, "clave de acceso generada");
    Ok(clave)
}

fn armar_base(doc: &IdentidadDocumento) -> Result<String, ErrorValidacion> {
    let fecha = doc.fecha_emision.format("%d%m%Y").to_string();
    if validar_digitos("fecha_emision", &fecha, 8).is_err() {
        return Err(ErrorValidacion::FechaInvalida(doc.fecha_emision.to_string()));
    }
    validar_digitos("tipo_comprobante", &doc.tipo_comprobante, 2)?;
    validar_digitos("ruc", &doc.ruc, 13)?;
    validar_digitos("ambiente", &doc.ambiente, 1)?;
    validar_digitos("establecimiento", &doc.establecimiento, 3)?;
    validar_digitos("punto_emision", &doc.punto_emision, 3)?;
    if doc.secuencial == 0 || doc.secuencial > SECUENCIAL_MAXIMO {
        return Err(ErrorValidacion::SecuencialFueraDeRango(doc.secuencial));
    }
    validar_digitos("codigo_numerico", &doc.codigo_numerico, 8)?;
    validar_digitos("tipo_emision", &doc.tipo_emision, 1)?;

    let base = format!(
        "{}{}{}{}{}{}{:09}{}{}",
        fecha,
        doc.tipo_comprobante,
        doc.ruc,
        doc.ambiente,
        doc.establecimiento,
        doc.punto_emision,
        doc.secuencial,
        doc.codigo_numerico,
        doc.tipo_emision,
    );
    debug_assert_eq!(base.len(), LONGITUD_BASE);
    Ok(base)
}

/// Calcula el digito verificador usando modulo 11 con pesos [2,3,4,5,6,7]
/// ciclicos desde derecha a izquierda.
///
/// Un residuo de 0 o 1 se usa tal cual; cualquier otro da `11 - residuo`.
/// Caracteres que no son digitos cuentan como 0.
pub fn digito_verificador_modulo11(cadena: &str) -> u32 {
    let pesos = [2, 3, 4, 5, 6, 7];
    let mut suma: u32 = 0;

    for (i, ch) in cadena.chars().rev().enumerate() {
        let digito = ch.to_digit(10).unwrap_or(0);
        let peso = pesos[i % pesos.len()];
        suma += digito * peso;
    }

    match suma % 11 {
        residuo @ (0 | 1) => residuo,
        residuo => 11 - residuo,
    }
}

/// Acepta una clave ya emitida (guardada en BD o devuelta por el SRI)
/// despues de comprobar longitud, digitos, fecha y digito verificador.
pub fn verificar_clave_acceso(clave: &str) -> Result<ClaveAcceso, ErrorValidacion> {
    validar_digitos("clave_acceso", clave, LONGITUD_CLAVE)?;

    if fecha_desde_clave(&clave[0..8]).is_none() {
        return Err(ErrorValidacion::FechaInvalida(clave[0..8].to_string()));
    }

    let esperado = digito_verificador_modulo11(&clave[..LONGITUD_BASE]);
    let recibido = u32::from(clave.as_bytes()[LONGITUD_BASE] - b'0');
    if esperado != recibido {
        return Err(ErrorValidacion::DigitoVerificadorInvalido { esperado, recibido });
    }

    Ok(ClaveAcceso(clave.to_string()))
}

fn fecha_desde_clave(ddmmyyyy: &str) -> Option<NaiveDate> {
    let dia = ddmmyyyy.get(0..2)?.parse().ok()?;
    let mes = ddmmyyyy.get(2..4)?.parse().ok()?;
    let anio = ddmmyyyy.get(4..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(anio, mes, dia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn identidad(fecha: (i32, u32, u32), ruc: &str, secuencial: u64) -> IdentidadDocumento {
        IdentidadDocumento {
            fecha_emision: NaiveDate::from_ymd_opt(fecha.0, fecha.1, fecha.2).unwrap(),
            tipo_comprobante: "01".to_string(),
            ruc: ruc.to_string(),
            ambiente: "2".to_string(),
            establecimiento: "001".to_string(),
            punto_emision: "002".to_string(),
            secuencial,
            codigo_numerico: "12345678".to_string(),
            tipo_emision: "1".to_string(),
        }
    }

    #[test_case("1234567890123456789012345678901234567890123456", 4 ; "vector de 46 digitos")]
    #[test_case("123456789012345678901234567890123456789012345678", 7 ; "vector de 48 digitos")]
    #[test_case("000000000000000000000000000000000000000000000000", 0 ; "todo ceros")]
    #[test_case("000000000000000000000000000000000000000000000006", 1 ; "residuo uno")]
    #[test_case("211020110117921467390011002001000000001123456781", 3 ; "ejemplo ficha tecnica")]
    fn test_digito_verificador(cadena: &str, esperado: u32) {
        assert_eq!(digito_verificador_modulo11(cadena), esperado);
    }

    #[test]
    fn test_clave_acceso_longitud() {
        let clave = generar_clave_acceso(&identidad((2026, 2, 11), "1234567890001", 1)).unwrap();
        assert_eq!(clave.as_str().len(), 49);
        // Todos deben ser digitos
        assert!(clave.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_clave_acceso_estructura() {
        let clave = generar_clave_acceso(&identidad((2026, 3, 15), "0912345678001", 123)).unwrap();
        assert_eq!(
            clave.as_str(),
            "1503202601091234567800120010020000001231234567818"
        );
        let c = clave.as_str();
        // fecha ddmmyyyy
        assert_eq!(&c[0..8], "15032026");
        assert_eq!(&c[8..10], "01");
        assert_eq!(&c[10..23], "0912345678001");
        assert_eq!(&c[23..24], "2");
        assert_eq!(&c[24..27], "001");
        assert_eq!(&c[27..30], "002");
        assert_eq!(&c[30..39], "000000123");
        assert_eq!(&c[39..47], "12345678");
        assert_eq!(&c[47..48], "1");
        assert_eq!(clave.digito_verificador(), 8);
    }

    #[test]
    fn test_clave_acceso_idempotente() {
        let doc = identidad((2026, 3, 15), "0912345678001", 123);
        assert_eq!(generar_clave_acceso(&doc), generar_clave_acceso(&doc));
    }

    #[test]
    fn test_ruc_corto() {
        let err = generar_clave_acceso(&identidad((2026, 3, 15), "091234567", 1)).unwrap_err();
        assert_eq!(err.campo(), Some("ruc"));
    }

    #[test]
    fn test_codigo_numerico_con_letras() {
        let mut doc = identidad((2026, 3, 15), "0912345678001", 1);
        doc.codigo_numerico = "1234567X".to_string();
        assert_eq!(
            generar_clave_acceso(&doc),
            Err(ErrorValidacion::NoNumerico { campo: "codigo_numerico" })
        );
    }

    #[test_case(0 ; "cero")]
    #[test_case(1_000_000_000 ; "diez digitos")]
    fn test_secuencial_fuera_de_rango(secuencial: u64) {
        let doc = identidad((2026, 3, 15), "0912345678001", secuencial);
        assert_eq!(
            generar_clave_acceso(&doc),
            Err(ErrorValidacion::SecuencialFueraDeRango(secuencial))
        );
    }

    #[test]
    fn test_secuencial_maximo() {
        let doc = identidad((2026, 3, 15), "0912345678001", SECUENCIAL_MAXIMO);
        let clave = generar_clave_acceso(&doc).unwrap();
        assert_eq!(&clave.as_str()[30..39], "999999999");
    }

    #[test]
    fn test_tipo_emision_vacio() {
        let mut doc = identidad((2026, 3, 15), "0912345678001", 1);
        doc.tipo_emision = String::new();
        let err = generar_clave_acceso(&doc).unwrap_err();
        assert_eq!(err.campo(), Some("tipo_emision"));
    }

    #[test]
    fn test_verificar_ejemplo_ficha_tecnica() {
        let clave = verificar_clave_acceso("2110201101179214673900110020010000000011234567813").unwrap();
        let c = clave.componentes();
        assert_eq!(c.fecha_emision, NaiveDate::from_ymd_opt(2011, 10, 21).unwrap());
        assert_eq!(c.tipo_comprobante, "01");
        assert_eq!(c.ruc, "1792146739001");
        assert_eq!(c.ambiente, "1");
        assert_eq!(c.establecimiento, "002");
        assert_eq!(c.punto_emision, "001");
        assert_eq!(c.secuencial, 1);
        assert_eq!(c.codigo_numerico, "12345678");
        assert_eq!(c.tipo_emision, "1");
        assert_eq!(c.digito_verificador, 3);
    }

    #[test]
    fn test_verificar_digito_incorrecto() {
        assert_eq!(
            verificar_clave_acceso("2110201101179214673900110020010000000011234567814"),
            Err(ErrorValidacion::DigitoVerificadorInvalido { esperado: 3, recibido: 4 })
        );
    }

    #[test]
    fn test_verificar_longitud() {
        let err = verificar_clave_acceso("211020110117921467390011").unwrap_err();
        assert_eq!(err.campo(), Some("clave_acceso"));
    }

    #[test]
    fn test_verificar_fecha_imposible() {
        // 31/02 con digito verificador correcto
        let base = "310220260109123456780012001002000000123123456781";
        let clave = format!("{}{}", base, digito_verificador_modulo11(base));
        assert!(matches!(
            verificar_clave_acceso(&clave),
            Err(ErrorValidacion::FechaInvalida(_))
        ));
    }

    #[test]
    fn test_serde_clave() {
        let clave: ClaveAcceso =
            serde_json::from_str("\"2110201101179214673900110020010000000011234567813\"").unwrap();
        assert_eq!(
            serde_json::to_string(&clave).unwrap(),
            "\"2110201101179214673900110020010000000011234567813\""
        );
        assert!(serde_json::from_str::<ClaveAcceso>("\"2110201101179214673900110020010000000011234567810\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let clave: ClaveAcceso = "2110201101179214673900110020010000000011234567813".parse().unwrap();
        assert_eq!(clave.to_string(), "2110201101179214673900110020010000000011234567813");
    }

    fn identidad_valida() -> impl Strategy<Value = IdentidadDocumento> {
        (
            (2000i32..2100, 1u32..=12, 1u32..=28),
            "0[1-7]",
            "[0-9]{13}",
            "[12]",
            "[0-9]{3}",
            "[0-9]{3}",
            1u64..=SECUENCIAL_MAXIMO,
            "[0-9]{8}",
        )
            .prop_map(|((a, m, d), tipo, ruc, amb, est, pto, sec, cod)| IdentidadDocumento {
                fecha_emision: NaiveDate::from_ymd_opt(a, m, d).unwrap(),
                tipo_comprobante: tipo,
                ruc,
                ambiente: amb,
                establecimiento: est,
                punto_emision: pto,
                secuencial: sec,
                codigo_numerico: cod,
                tipo_emision: "1".to_string(),
            })
    }

    proptest! {
        #[test]
        fn prop_clave_49_digitos_y_verificable(doc in identidad_valida()) {
            let clave = generar_clave_acceso(&doc).unwrap();
            prop_assert_eq!(clave.as_str().len(), LONGITUD_CLAVE);
            prop_assert!(clave.as_str().bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(verificar_clave_acceso(clave.as_str()), Ok(clave.clone()));

            let c = clave.componentes();
            prop_assert_eq!(c.fecha_emision, doc.fecha_emision);
            prop_assert_eq!(c.secuencial, doc.secuencial);
            prop_assert_eq!(c.ruc, doc.ruc);
        }

        #[test]
        fn prop_digito_en_rango_y_determinista(cadena in "[0-9]{48}") {
            let dv = digito_verificador_modulo11(&cadena);
            prop_assert!(dv <= 9);
            prop_assert_eq!(dv, digito_verificador_modulo11(&cadena));
        }

        #[test]
        fn prop_digito_verificador_alterado_no_verifica(doc in identidad_valida(), delta in 1u8..=9) {
            let clave = generar_clave_acceso(&doc).unwrap();
            let mut bytes = clave.as_str().as_bytes().to_vec();
            bytes[LONGITUD_BASE] = b'0' + (bytes[LONGITUD_BASE] - b'0' + delta) % 10;
            let alterada = String::from_utf8(bytes).unwrap();
            let es_error_dv = matches!(
                verificar_clave_acceso(&alterada),
                Err(ErrorValidacion::DigitoVerificadorInvalido { .. })
            );
            prop_assert!(es_error_dv);
        }
    }
}
