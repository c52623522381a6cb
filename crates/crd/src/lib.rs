//! Rule-driven CEL validation patching for CRD (CustomResourceDefinition) schemas
//!
//! Rules name a CRD file, a dotted path below the resource's `spec` and the
//! `x-kubernetes-validations` entries to place there. The patcher walks each
//! version's `openAPIV3Schema`, creating missing nodes, and merges entries
//! without duplicating ones already present.

pub mod document;
pub mod error;
pub mod merge;
pub mod path;
pub mod patcher;
pub mod rule;

pub use document::{dump_documents, load_documents, DocumentStart, YamlFormat};
pub use error::{PatchError, Result};
pub use merge::{ensure_validations, merge_validations, VALIDATIONS_KEY};
pub use path::{spec_path_to_schema_path, walk_schema_path, SchemaPath, Segment};
pub use patcher::{patch_content, patch_documents, patch_file, PatchMode, PatchOutcome, CRD_KIND};
pub use rule::{load_rules, parse_rules, Rule, DEFAULT_RULE_NAME};
