/// Registry index of a block type. Stable for a given catalog file; stored
/// state is persisted by name, not id, so renumbering the catalog is safe.
pub type BlockId = u16;
