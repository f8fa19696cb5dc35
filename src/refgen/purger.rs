//! Method body replacement.

use log::debug;

use crate::{
    metadata::method::{Method, MethodBody},
    refgen::StubKind,
};

/// Replace the body of `method` with the `stub` sequence.
///
/// Methods without a body, and methods whose code type is not IL, are left untouched and
/// `false` is returned. The new body uses a tiny header without locals or exception handlers.
///
/// ```rust
/// use refasm::{
///     metadata::{method::{Method, MethodBody}, signatures::MethodSignature},
///     refgen::{purge, StubKind},
/// };
///
/// let mut method = Method::new("Run", 0x0006, MethodSignature::default());
/// method.body = Some(MethodBody::from_code(vec![0x00, 0x00, 0x2A]));
///
/// assert!(purge(&mut method, StubKind::Throw));
/// assert_eq!(method.body.unwrap().code, [0x14, 0x7A]);
/// ```
pub fn purge(method: &mut Method, stub: StubKind) -> bool {
    if method.body.is_none() {
        debug!("Skipped method {} (no body)", method.name);
        return false;
    }

    if !method.is_il() {
        debug!("Skipped method {} (no IL body)", method.name);
        return false;
    }

    method.body = Some(MethodBody::from_code(stub.code().to_vec()));
    debug!("Purged method {}", method.name);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        method::{ExceptionHandler, ExceptionHandlerFlags, MethodImplCodeType},
        signatures::{MethodSignature, TypeSignature},
    };

    fn with_body() -> Method {
        let mut method = Method::new(
            "Compute",
            0x0006,
            MethodSignature::new_static(TypeSignature::I4, vec![TypeSignature::I4]),
        );
        method.body = Some(MethodBody {
            size_code: 6,
            size_header: 12,
            local_var_sig_token: 0x1100_0004,
            max_stack: 3,
            is_fat: true,
            is_init_local: true,
            is_exception_data: true,
            code: vec![0x00, 0x02, 0xDE, 0x00, 0xDC, 0x2A],
            exception_handlers: vec![ExceptionHandler {
                flags: ExceptionHandlerFlags::FINALLY,
                try_offset: 0,
                try_length: 3,
                handler_offset: 3,
                handler_length: 2,
                filter_offset: 0,
            }],
        });
        method
    }

    #[test]
    fn throw_stub() {
        let mut method = with_body();
        let signature = method.signature.clone();

        assert!(purge(&mut method, StubKind::Throw));

        let body = method.body.as_ref().unwrap();
        assert_eq!(body.code, [0x14, 0x7A]);
        assert!(!body.is_fat);
        assert!(!body.is_init_local);
        assert!(!body.is_exception_data);
        assert!(body.exception_handlers.is_empty());
        assert_eq!(body.local_var_sig_token, 0);
        assert_eq!(body.encode().unwrap(), [0x0A, 0x14, 0x7A]);
        assert_eq!(method.signature, signature);
    }

    #[test]
    fn return_stub() {
        let mut method = with_body();
        assert!(purge(&mut method, StubKind::Return));
        assert_eq!(method.body.unwrap().encode().unwrap(), [0x06, 0x2A]);
    }

    #[test]
    fn skips_bodyless_and_native() {
        let mut abstract_method = Method::new("Run", 0x0406, MethodSignature::default());
        assert!(!purge(&mut abstract_method, StubKind::Throw));
        assert!(abstract_method.body.is_none());

        let mut native = with_body();
        native.impl_flags = MethodImplCodeType::NATIVE.bits();
        let original = native.body.clone();
        assert!(!purge(&mut native, StubKind::Throw));
        assert_eq!(native.body, original);
    }

    #[test]
    fn purge_is_stable() {
        let mut method = with_body();
        purge(&mut method, StubKind::Throw);
        let once = method.clone();
        purge(&mut method, StubKind::Throw);
        assert_eq!(method, once);
    }
}
