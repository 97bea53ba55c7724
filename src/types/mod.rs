// ABOUTME: Validated domain types for Kubernetes object references.
// ABOUTME: Names and namespaces are checked once at config load time.

mod namespace;
mod resource_name;
mod workload_kind;

pub use namespace::{Namespace, NamespaceError};
pub use resource_name::{ResourceName, ResourceNameError};
pub use workload_kind::WorkloadKind;
