//! Floor map and breakable platform generation
//!
//! The tile map is a flat row-major list of sheet indices. Every upper floor is three
//! rows (empty / pipe / empty), the bottom floor ends in a row with the drain, and
//! optional filler rows follow underneath. Platforms are rows of half-tile blocks laid
//! out in random per-column permutations and rebuilt on every level.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::SimRng;
use super::physics::Collider;
use super::rect::Rect;
use crate::consts::tiles;
use crate::settings::{MapSettings, Settings};

/// A breakable platform block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
}

impl Collider for Block {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// Blocks of one floor, with a cached rectangle covering all of them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRow {
    pub extent: Rect,
    pub blocks: Vec<Block>,
}

/// Kinds of tile row the map is assembled from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Empty,
    Pipe,
    Bottom,
    Sub,
}

/// One row of tile indices for `kind`
///
/// Walls sit in the two columns outside each side of the playable area; the bottom and
/// filler rows leave a gap at the drain column.
pub fn tile_row(kind: RowKind, map: &MapSettings) -> Vec<i32> {
    let margin = map.side_margin();
    let right_inner = margin + map.playable_width;
    let drain = map.drain_col();

    (0..map.width)
        .map(|col| {
            if col + 2 < margin || col > right_inner + 1 {
                tiles::EMPTY
            } else if col + 2 == margin {
                tiles::WALL_LEFT
            } else if col + 1 == margin {
                match kind {
                    RowKind::Empty => tiles::WALL_RIGHT,
                    RowKind::Pipe => tiles::PIPE_LEFT,
                    RowKind::Bottom => tiles::CORNER_LEFT,
                    RowKind::Sub => tiles::SUB,
                }
            } else if col == right_inner {
                match kind {
                    RowKind::Empty => tiles::WALL_LEFT,
                    RowKind::Pipe => tiles::PIPE_RIGHT,
                    RowKind::Bottom => tiles::CORNER_RIGHT,
                    RowKind::Sub => tiles::SUB,
                }
            } else if col == right_inner + 1 {
                tiles::WALL_RIGHT
            } else {
                match kind {
                    RowKind::Empty | RowKind::Pipe => tiles::EMPTY,
                    RowKind::Bottom if col == drain => tiles::DRAIN,
                    RowKind::Bottom => tiles::FLOOR,
                    RowKind::Sub if col == drain => tiles::EMPTY,
                    RowKind::Sub if col + 1 == drain => tiles::WALL_RIGHT,
                    RowKind::Sub if col == drain + 1 => tiles::WALL_LEFT,
                    RowKind::Sub => tiles::SUB,
                }
            }
        })
        .collect()
}

/// Full tile index list for `floors` floors plus `subfloors` filler rows
pub fn tile_rows(map: &MapSettings, floors: u32, subfloors: u32) -> Vec<i32> {
    let empty = tile_row(RowKind::Empty, map);
    let pipe = tile_row(RowKind::Pipe, map);
    let bottom = tile_row(RowKind::Bottom, map);
    let sub = tile_row(RowKind::Sub, map);

    let rows = floors as usize * 3 + subfloors as usize;
    let mut indices = Vec::with_capacity(rows * map.width as usize);
    for _ in 1..floors {
        indices.extend_from_slice(&empty);
        indices.extend_from_slice(&pipe);
        indices.extend_from_slice(&empty);
    }
    indices.extend_from_slice(&empty);
    indices.extend_from_slice(&empty);
    indices.extend_from_slice(&bottom);
    for _ in 0..subfloors {
        indices.extend_from_slice(&sub);
    }
    indices
}

/// Tile map, playable bounds, drain and platforms of the current level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    /// Row-major tile indices, `map_width` per row
    pub tiles: Vec<i32>,
    pub map_width: u32,
    /// Left edge of the map on screen
    pub x_offset: f32,
    /// Top edge of the first tile row on screen
    pub y_offset: f32,
    /// Region the actors move in
    pub bounds: Rect,
    /// Enemies touching this fall to their death
    pub drain: Rect,
    pub rows: Vec<BlockRow>,
    next_block_id: u32,
}

impl Floor {
    /// Build the map geometry and a first platform layout
    pub fn generate(settings: &Settings, rng: &mut SimRng) -> Self {
        let mut floor = Self {
            tiles: Vec::new(),
            map_width: settings.map.width,
            x_offset: 0.0,
            y_offset: 0.0,
            bounds: Rect::default(),
            drain: Rect::default(),
            rows: Vec::new(),
            next_block_id: 1,
        };
        floor.rebuild_map(settings, settings.map.floors, settings.map.subfloors);
        floor.generate_platforms(&settings.map, settings.map.floors, rng);
        floor
    }

    /// Re-emit tiles and recompute bounds/drain for a floor count
    pub fn rebuild_map(&mut self, settings: &Settings, floors: u32, subfloors: u32) {
        let map = &settings.map;
        let screen = &settings.screen;

        self.tiles = tile_rows(map, floors, subfloors);
        self.map_width = map.width;
        self.x_offset = ((screen.width - map.width as f32 * map.tile_width) / 2.0).floor();
        let rows = self.tiles.len() / map.width as usize;
        self.y_offset = screen.height - rows as f32 * map.tile_height;

        // Short maps sit on the screen bottom, so the bounds start at the first tile row
        let left = self.x_offset + map.tile_width * map.side_margin() as f32;
        let bottom = screen.height - (subfloors as f32 + 1.0) * map.tile_height;
        self.bounds = Rect::new(
            left,
            self.y_offset,
            map.playable_width as f32 * map.tile_width,
            bottom - self.y_offset,
        );

        let drain_tile = Rect::new(
            self.x_offset + map.drain_col() as f32 * map.tile_width,
            self.bounds.bottom(),
            map.tile_width,
            map.tile_height,
        );
        self.drain = drain_tile
            .inflated(map.tile_width * -0.99, map.tile_height * -0.75)
            .translated(Vec2::new(0.0, map.tile_height * -0.5));

        log::info!(
            "Built map: {} floors, {} sub-floor rows, bounds {:?}",
            floors,
            subfloors,
            self.bounds
        );
    }

    /// Lay out fresh random platforms, one row per upper floor
    pub fn generate_platforms(&mut self, map: &MapSettings, floors: u32, rng: &mut SimRng) {
        self.rows.clear();
        let mut top = self.bounds.top() + map.tile_height * 2.0;

        for _ in 1..floors {
            let mut row = BlockRow::default();
            for col in 0..map.playable_width {
                let left = self.bounds.left() + col as f32 * map.tile_width;
                let bottom_left = rng.random_bool(0.5);
                let bottom_right = rng.random_bool(0.5);
                self.push_column(&mut row, map, left, top, bottom_left, bottom_right);
            }
            row.extent = row
                .blocks
                .iter()
                .map(|b| b.rect)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_default();
            self.rows.push(row);
            top += map.tile_height * 3.0;
        }

        log::info!(
            "Generated {} platform rows with {} blocks",
            self.rows.len(),
            self.block_count()
        );
    }

    /// One of the four column permutations: a top pair plus optional bottom blocks
    fn push_column(
        &mut self,
        row: &mut BlockRow,
        map: &MapSettings,
        left: f32,
        top: f32,
        bottom_left: bool,
        bottom_right: bool,
    ) {
        let (w, h) = (map.block_width, map.block_height);
        let mut cells = vec![(left, top), (left + w, top)];
        if bottom_left {
            cells.push((left, top + h));
        }
        if bottom_right {
            cells.push((left + w, top + h));
        }
        for (x, y) in cells {
            let id = self.next_block_id;
            self.next_block_id += 1;
            row.blocks.push(Block {
                id,
                rect: Rect::new(x, y, w, h),
            });
        }
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.rows.iter().flat_map(|row| row.blocks.iter())
    }

    pub fn block_count(&self) -> usize {
        self.rows.iter().map(|row| row.blocks.len()).sum()
    }

    /// Blocks in the rows whose extent overlaps `probe`
    pub fn blocks_near<'a>(&'a self, probe: &'a Rect) -> impl Iterator<Item = &'a Block> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.extent.intersects(probe))
            .flat_map(|row| row.blocks.iter())
    }

    /// Remove blocks by id
    pub fn remove_blocks(&mut self, ids: &[u32]) {
        for row in &mut self.rows {
            row.blocks.retain(|b| !ids.contains(&b.id));
        }
    }

    /// Number of tile rows in the map
    pub fn tile_row_count(&self) -> usize {
        self.tiles.len() / self.map_width as usize
    }

    /// Tile index at (row, col), `None` outside the map
    pub fn tile_at(&self, row: usize, col: usize) -> Option<i32> {
        if col >= self.map_width as usize {
            return None;
        }
        self.tiles.get(row * self.map_width as usize + col).copied()
    }

    /// Spawn rectangle for an enemy on `floor_index` (0 is the top floor)
    pub fn enemy_spawn_rect(&self, settings: &Settings, floor_index: u32, facing_left: bool) -> Rect {
        let map = &settings.map;
        let mut rect = Rect::new(0.0, 0.0, settings.enemy.width, settings.enemy.height);
        rect.set_bottom(self.bounds.top() + map.tile_height * (2.0 + 3.0 * floor_index as f32));
        rect.set_left(self.x_offset + map.side_margin() as f32 * map.tile_width);
        if facing_left {
            rect.x += map.tile_width * map.playable_width as f32;
        }
        rect
    }
}
