//! The CORBA binding: the protocol's four fixed interceptor lists.

use hermes_core::{Binding, BindingInfo, Direction, Interceptor};
use std::sync::Arc;

/// A CORBA protocol binding for one endpoint configuration.
///
/// The four lists are populated by the factory at creation time and never
/// mutated afterwards; chains assembled from them are shared read-only
/// across all concurrent calls.
pub struct CorbaBinding {
    info: BindingInfo,
    in_interceptors: Vec<Arc<dyn Interceptor>>,
    out_interceptors: Vec<Arc<dyn Interceptor>>,
    in_fault_interceptors: Vec<Arc<dyn Interceptor>>,
    out_fault_interceptors: Vec<Arc<dyn Interceptor>>,
}

impl CorbaBinding {
    pub(crate) fn new(
        info: BindingInfo,
        in_interceptors: Vec<Arc<dyn Interceptor>>,
        out_interceptors: Vec<Arc<dyn Interceptor>>,
        in_fault_interceptors: Vec<Arc<dyn Interceptor>>,
        out_fault_interceptors: Vec<Arc<dyn Interceptor>>,
    ) -> Self {
        Self {
            info,
            in_interceptors,
            out_interceptors,
            in_fault_interceptors,
            out_fault_interceptors,
        }
    }
}

impl Binding for CorbaBinding {
    fn binding_info(&self) -> &BindingInfo {
        &self.info
    }

    fn interceptors(&self, direction: Direction) -> &[Arc<dyn Interceptor>] {
        match direction {
            Direction::In => &self.in_interceptors,
            Direction::Out => &self.out_interceptors,
            Direction::InFault => &self.in_fault_interceptors,
            Direction::OutFault => &self.out_fault_interceptors,
        }
    }
}
