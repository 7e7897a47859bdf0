// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use convoy::PackageDescriptor;

/// Install a logging subscriber for test output.
///
/// Safe to call from every test; only the first call wins.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

/// Build a complete package descriptor with dependencies per category.
#[allow(dead_code)]
pub fn package(name: &str, dependencies: &[(&str, &[&str])]) -> PackageDescriptor {
    let mut descriptor = PackageDescriptor::new(format!("/ws/{name}"));
    descriptor.package_type = "cmake".to_string();
    descriptor.name = name.to_string();
    for (category, names) in dependencies {
        descriptor.add_dependencies(*category, names.iter().copied());
    }
    descriptor
}
