//! Entity registry: which gameplay entity each physics body stands for
//!
//! Holds body ids only; the physics adapter owns the bodies themselves.

use std::collections::HashMap;

use super::physics::BodyId;
use super::state::{Block, BlockId, EntityKind};
use crate::error::RoundError;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    kinds: HashMap<BodyId, EntityKind>,
    blocks: HashMap<BlockId, Block>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a non-block body (ball, paddle, wall)
    pub fn register(&mut self, body: BodyId, kind: EntityKind) {
        self.kinds.insert(body, kind);
    }

    pub fn register_block(&mut self, block: Block) {
        self.kinds.insert(block.body, EntityKind::Block(block.id));
        self.blocks.insert(block.id, block);
    }

    /// Remove a block and its body tag together
    pub fn remove_block(&mut self, id: BlockId) -> Result<Block, RoundError> {
        let block = self
            .blocks
            .remove(&id)
            .ok_or(RoundError::BlockNotFound(id))?;
        self.kinds.remove(&block.body);
        Ok(block)
    }

    pub fn remaining_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn kind_of(&self, body: BodyId) -> Option<EntityKind> {
        self.kinds.get(&body).copied()
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Live blocks in no particular order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Drop every block, returning them so their bodies can be released
    pub fn drain_blocks(&mut self) -> Vec<Block> {
        let blocks: Vec<Block> = self.blocks.drain().map(|(_, block)| block).collect();
        for block in &blocks {
            self.kinds.remove(&block.body);
        }
        blocks
    }
}
