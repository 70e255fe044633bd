pub mod clave_acceso;
pub mod codigo;
pub mod numeracion;

pub use clave_acceso::{
    digito_verificador_modulo11, generar_clave_acceso, verificar_clave_acceso, ClaveAcceso,
    ComponentesClave,
};
pub use codigo::CodigoNumerico;
pub use numeracion::{formatear_numero_documento, formatear_numero_nota_venta, formatear_numero_sri};
