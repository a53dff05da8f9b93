use crate::pb::HealthRes;

/// Health check shared by the gRPC services and the REST gateway
///
/// Each process reports under its own component name so that a probe hitting the wrong port is
/// obvious from the response.
#[derive(Clone, Debug)]
pub struct HealthService {
    component: &'static str,
}

impl HealthService {
    /// Creates a health service for the named component.
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    /// Returns a `HealthRes` indicating the component is alive.
    ///
    /// Reaching this code at all is the signal; the check does not probe downstream services.
    pub fn check_health(&self) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!("Textcloud {} is alive", self.component),
        }
    }
}
