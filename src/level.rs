//! Level layouts
//!
//! A layout is the ordered list of block placements a round starts with. It
//! is consumed once when the round is built and validated against the
//! round's settings at that point.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_HEIGHT, BLOCK_WIDTH};
use crate::error::ConfigError;
use crate::settings::RoundSettings;

/// One block: grid cell plus centre position in playfield space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacement {
    pub column: u32,
    pub row: u32,
    pub x: f32,
    pub y: f32,
}

impl BlockPlacement {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

fn default_block_width() -> f32 {
    BLOCK_WIDTH
}

fn default_block_height() -> f32 {
    BLOCK_HEIGHT
}

/// Block layout for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    #[serde(default = "default_block_width")]
    pub block_width: f32,
    #[serde(default = "default_block_height")]
    pub block_height: f32,
    pub blocks: Vec<BlockPlacement>,
}

impl LevelLayout {
    /// Tile index that marks a block cell in tile data
    pub const BLOCK_TILE: u32 = 1;

    pub fn new(block_width: f32, block_height: f32, blocks: Vec<BlockPlacement>) -> Self {
        Self {
            block_width,
            block_height,
            blocks,
        }
    }

    /// Build from tile-layer data (rows of tile indices)
    ///
    /// Every cell holding [`Self::BLOCK_TILE`] becomes a block the size of one
    /// tile, centred on that tile.
    pub fn from_tiles(tiles: &[Vec<u32>], tile_width: f32, tile_height: f32, origin: Vec2) -> Self {
        let mut blocks = Vec::new();
        for (row, cells) in tiles.iter().enumerate() {
            for (column, &tile) in cells.iter().enumerate() {
                if tile != Self::BLOCK_TILE {
                    continue;
                }
                let top_left = origin + Vec2::new(column as f32 * tile_width, row as f32 * tile_height);
                blocks.push(BlockPlacement {
                    column: column as u32,
                    row: row as u32,
                    x: top_left.x + tile_width * 0.5,
                    y: top_left.y + tile_height * 0.5,
                });
            }
        }
        Self::new(tile_width, tile_height, blocks)
    }

    /// Fully packed grid of default-sized blocks, top-left at `origin`
    pub fn grid(columns: u32, rows: u32, origin: Vec2) -> Self {
        let tiles = vec![vec![Self::BLOCK_TILE; columns as usize]; rows as usize];
        Self::from_tiles(&tiles, BLOCK_WIDTH, BLOCK_HEIGHT, origin)
    }

    /// Parse a layout from JSON (validated later, against round settings)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Check the layout can be played with the given settings
    pub fn validate(&self, settings: &RoundSettings) -> Result<(), ConfigError> {
        if !self.block_width.is_finite() {
            return Err(ConfigError::NonFinite("block_width"));
        }
        if !self.block_height.is_finite() {
            return Err(ConfigError::NonFinite("block_height"));
        }
        if self.block_width <= 0.0 || self.block_height <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "block_size",
                message: format!("{}x{} is not a positive size", self.block_width, self.block_height),
            });
        }
        if self.blocks.is_empty() {
            return Err(ConfigError::EmptyLevel);
        }

        let half = Vec2::new(self.block_width, self.block_height) * 0.5;
        let field = Vec2::new(settings.playfield_width, settings.playfield_height);
        let mut cells = HashSet::with_capacity(self.blocks.len());

        for placement in &self.blocks {
            if !placement.x.is_finite() || !placement.y.is_finite() {
                return Err(ConfigError::NonFinite("block position"));
            }
            let min = placement.center() - half;
            let max = placement.center() + half;
            if min.x < 0.0 || min.y < 0.0 || max.x > field.x || max.y > field.y {
                return Err(ConfigError::BlockOutOfBounds {
                    column: placement.column,
                    row: placement.row,
                });
            }
            if !cells.insert((placement.column, placement.row)) {
                return Err(ConfigError::DuplicateCell {
                    column: placement.column,
                    row: placement.row,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tiles_centres_blocks_on_tiles() {
        let tiles = vec![vec![0, 1, 0], vec![1, 0, 2]];
        let layout = LevelLayout::from_tiles(&tiles, 64.0, 32.0, Vec2::ZERO);

        assert_eq!(layout.len(), 2);
        assert_eq!(
            layout.blocks[0],
            BlockPlacement {
                column: 1,
                row: 0,
                x: 96.0,
                y: 16.0
            }
        );
        assert_eq!(
            layout.blocks[1],
            BlockPlacement {
                column: 0,
                row: 1,
                x: 32.0,
                y: 48.0
            }
        );
    }

    #[test]
    fn test_grid_fills_every_cell() {
        let layout = LevelLayout::grid(10, 4, Vec2::new(80.0, 64.0));
        assert_eq!(layout.len(), 40);
        assert!(layout.validate(&RoundSettings::default()).is_ok());
    }

    #[test]
    fn test_json_uses_default_block_size() {
        let layout = LevelLayout::from_json(r#"{ "blocks": [ { "column": 0, "row": 0, "x": 100.0, "y": 50.0 } ] }"#).unwrap();
        assert_eq!(layout.block_width, BLOCK_WIDTH);
        assert_eq!(layout.block_height, BLOCK_HEIGHT);
        assert_eq!(layout.blocks[0].center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_rejects_empty_level() {
        let layout = LevelLayout::new(64.0, 32.0, Vec::new());
        assert!(matches!(layout.validate(&RoundSettings::default()), Err(ConfigError::EmptyLevel)));
    }

    #[test]
    fn test_rejects_duplicate_cells() {
        let placement = BlockPlacement {
            column: 3,
            row: 1,
            x: 200.0,
            y: 100.0,
        };
        let layout = LevelLayout::new(64.0, 32.0, vec![placement, placement]);
        assert!(matches!(
            layout.validate(&RoundSettings::default()),
            Err(ConfigError::DuplicateCell { column: 3, row: 1 })
        ));
    }

    #[test]
    fn test_rejects_block_outside_playfield() {
        let layout = LevelLayout::new(
            64.0,
            32.0,
            vec![BlockPlacement {
                column: 0,
                row: 0,
                x: 790.0,
                y: 100.0,
            }],
        );
        assert!(matches!(
            layout.validate(&RoundSettings::default()),
            Err(ConfigError::BlockOutOfBounds { column: 0, row: 0 })
        ));
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let layout = LevelLayout::new(
            64.0,
            32.0,
            vec![BlockPlacement {
                column: 0,
                row: 0,
                x: f32::INFINITY,
                y: 100.0,
            }],
        );
        assert!(matches!(
            layout.validate(&RoundSettings::default()),
            Err(ConfigError::NonFinite("block position"))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(LevelLayout::from_json("[1, 2"), Err(ConfigError::Json(_))));
    }
}
