// ABOUTME: Argument vectors for every kubectl call the deployer makes.
// ABOUTME: Kept in one place so tests can match invocations exactly.

use std::path::Path;

use crate::types::{Namespace, ResourceName, WorkloadKind};

fn file_args(verb: &str, file: &Path, namespace: &Namespace) -> Vec<String> {
    vec![
        verb.to_string(),
        "-f".to_string(),
        file.display().to_string(),
        "-n".to_string(),
        namespace.to_string(),
    ]
}

/// `apply -f <file> -n <ns> --dry-run=server`
pub fn dry_run(file: &Path, namespace: &Namespace) -> Vec<String> {
    let mut args = file_args("apply", file, namespace);
    args.push("--dry-run=server".to_string());
    args
}

/// `diff -f <file> -n <ns>`
pub fn diff(file: &Path, namespace: &Namespace) -> Vec<String> {
    file_args("diff", file, namespace)
}

/// `apply -f <file> -n <ns>`
pub fn apply(file: &Path, namespace: &Namespace) -> Vec<String> {
    file_args("apply", file, namespace)
}

/// `get deployment <name> -n <ns> -o=jsonpath={.spec.replicas}`
pub fn replicas(name: &ResourceName, namespace: &Namespace) -> Vec<String> {
    vec![
        "get".to_string(),
        WorkloadKind::Deployment.as_kubectl().to_string(),
        name.to_string(),
        "-n".to_string(),
        namespace.to_string(),
        "-o=jsonpath={.spec.replicas}".to_string(),
    ]
}

/// `rollout status <kind> <name> -n <ns>`
pub fn rollout_status(kind: WorkloadKind, name: &ResourceName, namespace: &Namespace) -> Vec<String> {
    vec![
        "rollout".to_string(),
        "status".to_string(),
        kind.as_kubectl().to_string(),
        name.to_string(),
        "-n".to_string(),
        namespace.to_string(),
    ]
}

/// `get job <name> -n <ns> -o=jsonpath={.status.succeeded}`
pub fn job_succeeded(name: &ResourceName, namespace: &Namespace) -> Vec<String> {
    vec![
        "get".to_string(),
        WorkloadKind::Job.as_kubectl().to_string(),
        name.to_string(),
        "-n".to_string(),
        namespace.to_string(),
        "-o=jsonpath={.status.succeeded}".to_string(),
    ]
}

/// `logs job/<name> -n <ns>`
pub fn job_logs(name: &ResourceName, namespace: &Namespace) -> Vec<String> {
    vec![
        "logs".to_string(),
        format!("job/{name}"),
        "-n".to_string(),
        namespace.to_string(),
    ]
}
