//! Flat symbol table and address allocation
//!
//! Every name lives in one global scope. Entries keep declaration order for the
//! `name\taddress` export; an index map gives constant-time lookup.

use rustc_hash::FxHashMap;

use crate::parser::ast::TypeSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub name: String,
    pub address: usize,
    pub ty: TypeSpec,
    pub is_array: bool,
    /// Number of consecutive slots reserved from `address`.
    pub slots: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: FxHashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`. Returns `false` and leaves the table unchanged if the name
    /// is already bound.
    pub fn insert(&mut self, entry: SymbolEntry) -> bool {
        if self.index.contains_key(&entry.name) {
            return false;
        }
        self.index.insert(entry.name.clone(), self.entries.len());
        self.entries.push(entry);
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Entries in declaration order
    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name\taddress` per entry.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}\t{}\n", entry.name, entry.address))
            .collect()
    }
}

/// Bump allocator over a word-aligned address region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressAllocator {
    next: usize,
    stride: usize,
}

impl AddressAllocator {
    pub fn new(base: usize, stride: usize) -> Self {
        Self { next: base, stride }
    }

    pub fn allocate(&mut self) -> Option<usize> {
        self.allocate_block(1)
    }

    /// Reserves `slots` consecutive slots (at least one) and returns the first
    /// address, or `None` if the block would run past the address space. A
    /// failed call leaves the allocator untouched.
    pub fn allocate_block(&mut self, slots: usize) -> Option<usize> {
        let address = self.next;
        let next = slots
            .max(1)
            .checked_mul(self.stride)
            .and_then(|size| address.checked_add(size))?;
        self.next = next;
        Some(address)
    }

    /// Address the next allocation will return
    pub fn peek(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, address: usize) -> SymbolEntry {
        SymbolEntry {
            name: name.to_string(),
            address,
            ty: TypeSpec::Int,
            is_array: false,
            slots: 1,
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut table = SymbolTable::new();
        assert!(table.insert(entry("x", 500)));
        assert!(table.insert(entry("y", 504)));

        assert_eq!(table.lookup("y").map(|e| e.address), Some(504));
        assert!(table.lookup("z").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_insert_is_rejected() {
        let mut table = SymbolTable::new();
        assert!(table.insert(entry("x", 500)));
        assert!(!table.insert(entry("x", 504)));

        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("x").map(|e| e.address), Some(500));
    }

    #[test]
    fn test_render_keeps_declaration_order() {
        let mut table = SymbolTable::new();
        table.insert(entry("b", 500));
        table.insert(entry("a", 504));
        assert_eq!(table.render(), "b\t500\na\t504\n");
    }

    #[test]
    fn test_allocator() {
        let mut vars = AddressAllocator::new(500, 4);
        assert_eq!(vars.allocate(), Some(500));
        assert_eq!(vars.allocate_block(10), Some(504));
        assert_eq!(vars.allocate(), Some(544));
        assert_eq!(vars.allocate_block(0), Some(548));
        assert_eq!(vars.peek(), 552);
    }

    #[test]
    fn test_allocator_refuses_oversized_blocks() {
        let mut vars = AddressAllocator::new(500, 4);
        assert_eq!(vars.allocate_block(usize::MAX / 2), None);
        assert_eq!(vars.allocate_block(usize::MAX / 3), None);
        assert_eq!(vars.peek(), 500);
        assert_eq!(vars.allocate(), Some(500));

        let mut top = AddressAllocator::new(usize::MAX - 3, 4);
        assert_eq!(top.allocate(), None);
        assert_eq!(top.peek(), usize::MAX - 3);
    }
}
