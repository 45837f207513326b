#[path = "atomicize.rs"]
pub mod atomicize;
#[path = "discard-duplicates.rs"]
pub mod discard_duplicates;
#[path = "expand-shorthands/mod.rs"]
pub mod expand_shorthands;
#[path = "extract-sheets.rs"]
pub mod extract;
#[path = "flatten-nested.rs"]
pub mod flatten_nested;
#[path = "increase-specificity.rs"]
pub mod increase_specificity;
#[path = "parent-orphaned-pseudos.rs"]
pub mod parent_orphaned_pseudos;
#[path = "sort/mod.rs"]
pub mod sort;
#[path = "validate-properties.rs"]
pub mod validate;
#[path = "vendor-prefix.rs"]
pub mod vendor_prefix;
