use std::sync::Mutex;

/// Non-fatal reports raised while transforming, such as unresolvable imports.
pub trait Diagnostics: Send + Sync {
    fn warn(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    warnings: Mutex<Vec<String>>,
}

impl CollectingDiagnostics {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn warn(&self, message: &str) {
        if let Ok(mut guard) = self.warnings.lock() {
            guard.push(message.to_string());
        }
    }
}
