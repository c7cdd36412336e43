//! Protocol-agnostic service descriptions.
//!
//! These are the plain data shapes a service-description provider hands to
//! the pipeline: what a binding maps ([`BindingInfo`]), where an endpoint
//! lives ([`EndpointInfo`]), and a resolved target address
//! ([`EndpointReference`]). Loading and parsing descriptions is a
//! collaborator's job; the pipeline only consumes the results.

use serde::{Deserialize, Serialize};

/// Description of one operation exposed by a binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationInfo {
    /// The operation name.
    pub name: String,
    /// `true` if the operation has no response direction.
    pub one_way: bool,
}

impl OperationInfo {
    /// Creates a request/response operation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            one_way: false,
        }
    }

    /// Creates a one-way operation.
    #[must_use]
    pub fn one_way(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            one_way: true,
        }
    }
}

/// Abstract description of the protocol mapping for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingInfo {
    /// The binding/protocol identifier URI this info was written against.
    pub binding_id: String,
    /// The service this binding belongs to.
    pub service_name: String,
    /// The operations the binding maps.
    pub operations: Vec<OperationInfo>,
}

impl BindingInfo {
    /// Starts building a binding description.
    #[must_use]
    pub fn builder(
        binding_id: impl Into<String>,
        service_name: impl Into<String>,
    ) -> BindingInfoBuilder {
        BindingInfoBuilder {
            binding_id: binding_id.into(),
            service_name: service_name.into(),
            operations: Vec::new(),
        }
    }

    /// Returns the operation with the given name, if the binding maps it.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationInfo> {
        self.operations.iter().find(|op| op.name == name)
    }
}

/// Builder for [`BindingInfo`].
#[derive(Debug)]
pub struct BindingInfoBuilder {
    binding_id: String,
    service_name: String,
    operations: Vec<OperationInfo>,
}

impl BindingInfoBuilder {
    /// Adds an operation to the binding.
    #[must_use]
    pub fn operation(mut self, operation: OperationInfo) -> Self {
        self.operations.push(operation);
        self
    }

    /// Builds the description.
    #[must_use]
    pub fn build(self) -> BindingInfo {
        BindingInfo {
            binding_id: self.binding_id,
            service_name: self.service_name,
            operations: self.operations,
        }
    }
}

/// Protocol-agnostic description of one endpoint's address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointInfo {
    /// The service this endpoint belongs to.
    pub service_name: String,
    /// The transport identifier the endpoint was declared against.
    pub transport_id: String,
    /// The endpoint's default address.
    pub address: String,
}

impl EndpointInfo {
    /// Creates an endpoint description.
    #[must_use]
    pub fn new(
        service_name: impl Into<String>,
        transport_id: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            transport_id: transport_id.into(),
            address: address.into(),
        }
    }
}

/// A resolved target address for the initiating side of a call.
///
/// When no explicit reference is supplied, conduits resolve the target from
/// the endpoint's default address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointReference {
    /// The resolved target address.
    pub address: String,
}

impl EndpointReference {
    /// Creates a reference to the given address.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    /// Resolves a reference from an endpoint's default address.
    #[must_use]
    pub fn from_endpoint(endpoint: &EndpointInfo) -> Self {
        Self {
            address: endpoint.address.clone(),
        }
    }
}
