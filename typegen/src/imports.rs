//! Cross-module import collection.
//!
//! Generated modules reference each other freely (`Message` has a
//! `reply_to_message: Message`, `Chat` has a `pinned_message: Message`, and
//! so on). To keep those references from forming an import cycle at load
//! time, every import of another generated type is placed behind
//! `if typing.TYPE_CHECKING:`. Annotations are postponed by the template, so
//! the names are only needed by type checkers.

use std::collections::BTreeSet;

use tracing::trace;

use crate::config::FOUR_SPACE_INDENT;
use crate::resolve::ResolvedField;

const TYPING_IMPORT: &str = "import typing";
const TYPE_CHECKING_GUARD: &str = "if typing.TYPE_CHECKING:";

/// Collects the declared types referenced by a list of resolved fields.
///
/// Array wrappers were looked through during resolution and primitives carry
/// no references. The result is sorted and deduplicated, so the same fields
/// always yield the same set regardless of their order.
pub fn collect_dependencies(fields: &[ResolvedField<'_>]) -> BTreeSet<String> {
    fields
        .iter()
        .flat_map(|field| field.resolved.references.iter().cloned())
        .collect()
}

/// The two import fragments substituted into a type module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBlock {
    /// `import typing`, surrounded by newlines, or empty.
    pub typing_import: String,
    /// The guarded `from <package> import ...` block, or empty.
    pub deferred_imports: String,
}

impl ImportBlock {
    /// Builds the import fragments for the type named `owner`.
    ///
    /// The owner's own name is dropped from the set. When nothing else is
    /// referenced both fragments are empty strings, so the generated module
    /// contains no guard at all.
    pub fn for_type(owner: &str, fields: &[ResolvedField<'_>], package: &str) -> Self {
        let mut dependencies = collect_dependencies(fields);
        dependencies.remove(owner);
        trace!(owner, ?dependencies, "Collected imports");

        if dependencies.is_empty() {
            return Self::default();
        }

        let names = dependencies.into_iter().collect::<Vec<_>>().join(", ");
        Self {
            typing_import: format!("\n{TYPING_IMPORT}\n"),
            deferred_imports: format!(
                "\n{TYPE_CHECKING_GUARD}\n{FOUR_SPACE_INDENT}from {package} import {names}\n"
            ),
        }
    }
}
