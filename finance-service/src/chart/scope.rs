//! Role-based data scoping.
//!
//! Role strings are inspected here and nowhere else; everything downstream
//! pattern-matches on [`ScopePredicate`].

use crate::chart::Diagnostic;
use crate::services::ParentDirectory;

/// Which fee records a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopePredicate {
    /// No restriction (admin, accountant, teacher, or no role supplied).
    Global,
    /// A student sees only their own fees.
    SingleStudent(String),
    /// A parent sees the fees of their children.
    StudentSet(Vec<String>),
}

/// Outcome of scope resolution. `NoData` is not an error: the caller is
/// valid but can see nothing, and the report degrades to all zeros.
#[derive(Debug)]
pub enum ScopeResolution {
    Scoped(ScopePredicate),
    NoData(Diagnostic),
}

/// Identity the scope is resolved for. Explicit request parameters override
/// the authenticated session identity, which lets administrators view
/// another user's chart.
#[derive(Debug, Clone)]
pub struct ScopeRequest {
    pub caller_id: String,
    pub caller_role: Option<String>,
    pub requested_role: Option<String>,
    pub requested_user_id: Option<String>,
}

impl ScopeRequest {
    // Empty query parameters count as absent: `?role=` must fall back to
    // the session identity, not widen the scope.
    fn effective_role(&self) -> Option<&str> {
        self.requested_role
            .as_deref()
            .filter(|role| !role.is_empty())
            .or(self.caller_role.as_deref())
    }

    fn effective_user_id(&self) -> &str {
        self.requested_user_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.caller_id)
    }
}

/// Resolve the caller's visible record set.
///
/// A failed or empty parent-to-children lookup degrades to `NoData` so the
/// chart stays renderable.
pub async fn resolve_scope(
    directory: &dyn ParentDirectory,
    request: &ScopeRequest,
) -> ScopeResolution {
    let user_id = request.effective_user_id().to_string();

    match request.effective_role() {
        Some("student") => ScopeResolution::Scoped(ScopePredicate::SingleStudent(user_id)),
        Some("parent") => match directory.children_of(&user_id).await {
            Ok(children) if children.is_empty() => {
                ScopeResolution::NoData(Diagnostic::ParentHasNoChildren { parent_id: user_id })
            }
            Ok(children) => ScopeResolution::Scoped(ScopePredicate::StudentSet(children)),
            Err(err) => ScopeResolution::NoData(Diagnostic::DirectoryUnavailable {
                parent_id: user_id,
                source: err.to_string(),
            }),
        },
        _ => ScopeResolution::Scoped(ScopePredicate::Global),
    }
}
