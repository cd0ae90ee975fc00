//! Testing utilities for the mutation run workspace
//!
//! Shared test helpers, fixtures, and tracing setup.

#![allow(missing_docs)]

use mutrun_types::{
    MutationArena, MutationIndex, MutationType, MutationTypeId, Position, StackPolicy,
};

#[derive(Debug, Clone)]
struct TestMutation {
    position: Position,
    type_slot: usize,
    fixed: bool,
}

/// In-memory mutation arena
///
/// Handles are issued sequentially from 0. Type `m1` (stacking) is
/// registered up front.
#[derive(Debug, Clone)]
pub struct TestArena {
    mutations: Vec<TestMutation>,
    types: Vec<MutationType>,
}

impl Default for TestArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TestArena {
    pub fn new() -> Self {
        Self {
            mutations: Vec::new(),
            types: vec![MutationType::new(MutationTypeId::new(1))],
        }
    }

    /// Default type registered by `new`
    pub fn default_type(&self) -> MutationType {
        self.types[0]
    }

    pub fn add_type(&mut self, mutation_type: MutationType) -> MutationType {
        self.types.push(mutation_type);
        mutation_type
    }

    /// Register a type with the given id and policy
    pub fn add_type_with_policy(&mut self, id: u32, policy: StackPolicy) -> MutationType {
        self.add_type(MutationType::new(MutationTypeId::new(id)).with_stack_policy(policy))
    }

    fn type_slot(&self, mutation_type: &MutationType) -> usize {
        self.types
            .iter()
            .position(|t| t.id == mutation_type.id)
            .unwrap_or_else(|| panic!("mutation type {} not registered", mutation_type.id))
    }

    /// New mutation of the default type
    pub fn add(&mut self, position: Position) -> MutationIndex {
        let default_type = self.default_type();
        self.add_of_type(position, &default_type)
    }

    pub fn add_of_type(
        &mut self,
        position: Position,
        mutation_type: &MutationType,
    ) -> MutationIndex {
        let type_slot = self.type_slot(mutation_type);
        let raw = u32::try_from(self.mutations.len()).expect("arena exhausted");
        self.mutations.push(TestMutation {
            position,
            type_slot,
            fixed: false,
        });
        MutationIndex::new(raw)
    }

    /// New mutations of the default type, one per position
    pub fn add_all(&mut self, positions: &[Position]) -> Vec<MutationIndex> {
        positions.iter().map(|&p| self.add(p)).collect()
    }

    pub fn mark_fixed(&mut self, index: MutationIndex) {
        self.mutations[index.as_usize()].fixed = true;
    }

    /// Positions of `handles`, in order
    pub fn positions_of<'a>(
        &self,
        handles: impl IntoIterator<Item = &'a MutationIndex>,
    ) -> Vec<Position> {
        handles.into_iter().map(|&h| self.position(h)).collect()
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

impl MutationArena for TestArena {
    fn position(&self, index: MutationIndex) -> Position {
        self.mutations[index.as_usize()].position
    }

    fn mutation_type(&self, index: MutationIndex) -> &MutationType {
        &self.types[self.mutations[index.as_usize()].type_slot]
    }

    fn is_fixed(&self, index: MutationIndex) -> bool {
        self.mutations[index.as_usize()].fixed
    }
}

/// Raw values to handles
pub fn handles(raw: &[u32]) -> Vec<MutationIndex> {
    raw.iter().copied().map(MutationIndex::new).collect()
}

/// Install a test subscriber honouring `RUST_LOG`; safe to call repeatedly
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
