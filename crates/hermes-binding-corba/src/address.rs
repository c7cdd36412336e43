//! CORBA endpoint address grammar.
//!
//! Addresses are `scheme:rest` where the scheme is one of the factory's
//! declared prefixes and the rest is non-empty: `IOR:`/`ior:` hex reference
//! blobs, `file:`/`relfile:` reference files, `corba:` name-service names.

use hermes_core::{HermesError, HermesResult};

/// Every address-scheme prefix the CORBA factory services.
pub const URI_PREFIXES: [&str; 5] = ["IOR", "ior", "file", "relfile", "corba"];

/// Splits and validates a CORBA endpoint address.
///
/// Returns `(scheme, rest)` on success; a transport-setup error for unknown
/// schemes or an empty remainder.
pub(crate) fn validate(address: &str) -> HermesResult<(&str, &str)> {
    let Some((scheme, rest)) = address.split_once(':') else {
        return Err(HermesError::transport_setup_for(
            "address has no scheme",
            address,
        ));
    };
    if !URI_PREFIXES.contains(&scheme) {
        return Err(HermesError::transport_setup_for(
            format!("unsupported address scheme '{scheme}'"),
            address,
        ));
    }
    if rest.is_empty() {
        return Err(HermesError::transport_setup_for(
            "address has empty remainder",
            address,
        ));
    }
    Ok((scheme, rest))
}
