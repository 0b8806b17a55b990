use fieldops_domain::PermissionState;

/// Placeholder rendered while permissions are loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    label: String,
}

impl Placeholder {
    /// Creates a placeholder with a custom label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the placeholder label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new("Loading...")
    }
}

/// Result of rendering through an [`AccessGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView<T> {
    /// Permissions are not loaded yet.
    Fallback(Placeholder),
    /// Permissions are loaded; children were rendered.
    Content(T),
}

/// Holds back a subtree until the permission store is ready.
///
/// The gate does not deny anything by itself. Once the store reports success
/// or failure, children render and make their own permission checks.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    fallback: Placeholder,
}

impl AccessGate {
    /// Creates a gate with the default loading placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate with a custom fallback.
    #[must_use]
    pub fn with_fallback(fallback: Placeholder) -> Self {
        Self { fallback }
    }

    /// Renders `children` when the store is ready, the fallback otherwise.
    pub fn render<T>(&self, state: &PermissionState, children: impl FnOnce() -> T) -> GateView<T> {
        if state.is_ready() {
            GateView::Content(children())
        } else {
            GateView::Fallback(self.fallback.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use fieldops_core::AppError;
    use fieldops_domain::{PermissionSet, PermissionState};

    use super::{AccessGate, GateView, Placeholder};

    #[test]
    fn not_ready_renders_fallback_without_children() {
        let gate = AccessGate::with_fallback(Placeholder::new("Checking access"));
        let mut rendered = false;

        let view = gate.render(&PermissionState::Fetching, || {
            rendered = true;
        });

        assert_eq!(view, GateView::Fallback(Placeholder::new("Checking access")));
        assert!(!rendered);
    }

    #[test]
    fn uninitialized_store_uses_default_placeholder() {
        let view = AccessGate::new().render(&PermissionState::Uninitialized, || "sidebar");
        assert_eq!(view, GateView::Fallback(Placeholder::default()));
    }

    #[test]
    fn ready_states_render_children() {
        let gate = AccessGate::new();

        let ok = gate.render(&PermissionState::ready(PermissionSet::empty()), || "sidebar");
        let failed = gate.render(
            &PermissionState::Failed(AppError::Unavailable("offline".to_owned())),
            || "sidebar",
        );

        assert_eq!(ok, GateView::Content("sidebar"));
        assert_eq!(failed, GateView::Content("sidebar"));
    }
}
