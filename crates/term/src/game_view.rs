//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Tiles are drawn layer by layer, lowest first, so upper layers paint over
//! the tiles they cover. Each layer is shifted one column left to hint at
//! the stack height.

use crate::core::{turtle_layout, GameSnapshot, TileSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Suit, TileId, MAX_LAYER, TILE_SPAN};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Adapter status shown in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub client_count: u16,
    pub controller_id: Option<usize>,
}

/// Front-end state that is not part of the game itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlights {
    pub cursor: Option<TileId>,
    pub hint: Option<(TileId, TileId)>,
}

impl Highlights {
    fn is_hint(&self, id: TileId) -> bool {
        self.hint.is_some_and(|(a, b)| a == id || b == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const TILE_FACE: Rgb = Rgb::new(236, 228, 200);
const TILE_BLOCKED: Rgb = Rgb::new(150, 145, 130);
const TILE_SELECTED: Rgb = Rgb::new(250, 205, 80);
const TILE_HINT: Rgb = Rgb::new(130, 215, 150);
const TILE_CURSOR: Rgb = Rgb::new(140, 185, 245);
const TABLE: Rgb = Rgb::new(20, 60, 40);
const EDGE: Rgb = Rgb::new(90, 70, 50);

/// A lightweight terminal renderer for the Mahjong board.
pub struct GameView {
    /// Terminal columns per grid unit.
    unit_w: u16,
    /// Terminal rows per grid unit.
    unit_h: u16,
    /// Grid extent of the layout.
    grid_cols: u16,
    grid_rows: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // A tile is 2x2 grid units, so this draws 4x2 cells per tile.
        Self::new(2, 1)
    }
}

/// Screen geometry of one render pass.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(unit_w: u16, unit_h: u16) -> Self {
        let (grid_cols, grid_rows) = layout_extent();
        Self {
            unit_w,
            unit_h,
            grid_cols,
            grid_rows,
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Width and height of a tile in terminal cells.
    pub fn tile_size(&self) -> (u16, u16) {
        (TILE_SPAN as u16 * self.unit_w, TILE_SPAN as u16 * self.unit_h)
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = self.grid_cols * self.unit_w + MAX_LAYER as u16 + 2;
        let h = self.grid_rows * self.unit_h + 2;
        let x = viewport.width.saturating_sub(w + PANEL_W) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    /// Top-left terminal cell of a tile.
    fn tile_origin(&self, frame: Frame, tile: &TileSnapshot) -> Option<(u16, u16)> {
        let col = u16::try_from(tile.pos.col).ok()?;
        let row = u16::try_from(tile.pos.row).ok()?;
        let x = (frame.x + 1 + MAX_LAYER as u16 + col * self.unit_w)
            .checked_sub(tile.pos.layer as u16)?;
        let y = frame.y + 1 + row * self.unit_h;
        Some((x, y))
    }

    /// Render into an existing framebuffer, reusing its allocation.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        highlights: Highlights,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let frame = self.frame(viewport);
        let table = CellStyle::new(Rgb::new(60, 100, 80), TABLE);
        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', table);
        fb.draw_box(
            frame.x,
            frame.y,
            frame.w,
            frame.h,
            CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0)),
        );

        if !snap.paused {
            for layer in 0..=MAX_LAYER {
                for tile in snap.tiles.iter().filter(|t| t.pos.layer == layer) {
                    self.draw_tile(fb, frame, snap, highlights, tile);
                }
            }
        }

        self.draw_side_panel(fb, snap, adapter, viewport, frame);

        if snap.paused {
            self.draw_overlay(fb, frame, &["PAUSED", "press p to resume"]);
        } else if snap.game_over {
            self.draw_overlay(fb, frame, &["YOU WIN", "press n for a new deal"]);
        } else if snap.stuck {
            self.draw_overlay(fb, frame, &["NO MOVES LEFT", "s shuffle   n new deal"]);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        highlights: Highlights,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, highlights, None, viewport, &mut fb);
        fb
    }

    /// Topmost tile drawn at terminal cell `(x, y)`, for mouse clicks.
    pub fn hit_test(
        &self,
        snap: &GameSnapshot,
        viewport: Viewport,
        x: u16,
        y: u16,
    ) -> Option<TileId> {
        let frame = self.frame(viewport);
        let (tw, th) = self.tile_size();
        snap.tiles
            .iter()
            .filter(|t| {
                self.tile_origin(frame, t)
                    .is_some_and(|(tx, ty)| x >= tx && x < tx + tw && y >= ty && y < ty + th)
            })
            // Later tiles on the same layer are drawn last.
            .max_by_key(|t| (t.pos.layer, t.id))
            .map(|t| t.id)
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &GameSnapshot,
        highlights: Highlights,
        tile: &TileSnapshot,
    ) {
        let Some((x, y)) = self.tile_origin(frame, tile) else {
            return;
        };
        let (tw, th) = self.tile_size();

        let bg = if snap.selected == Some(tile.id) {
            TILE_SELECTED
        } else if highlights.is_hint(tile.id) {
            TILE_HINT
        } else if highlights.cursor == Some(tile.id) {
            TILE_CURSOR
        } else if tile.free {
            TILE_FACE.lighten(tile.pos.layer * 4)
        } else {
            TILE_BLOCKED.lighten(tile.pos.layer * 6)
        };

        let mut body = CellStyle::new(suit_color(tile.face.suit), bg).bold();
        if !tile.free {
            body = body.dim();
        }
        if highlights.cursor == Some(tile.id) {
            body = body.underline();
        }

        fb.fill_rect(x, y, tw, th, ' ', body);
        let code = tile.face.short_code();
        let text_x = x + tw.saturating_sub(2) / 2;
        fb.put_char(text_x, y, code[0], body);
        fb.put_char(text_x + 1, y, code[1], body);

        // Right edge separates neighbouring tiles.
        let edge = CellStyle::new(EDGE, bg);
        for dy in 0..th {
            fb.put_char(x + tw - 1, y + dy, '▕', edge);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let dim = value.dim();

        let mut y = frame.y;
        let field = |fb: &mut FrameBuffer, y: &mut u16, name: &str, n: u64| {
            fb.put_str(panel_x, *y, name, label);
            fb.put_u64(panel_x + 7, *y, n, value);
            *y = y.saturating_add(1);
        };
        field(fb, &mut y, "MOVES", snap.moves as u64);
        field(fb, &mut y, "LEFT", snap.remaining as u64);
        field(fb, &mut y, "PAIRS", snap.available_pairs as u64);
        field(fb, &mut y, "HINTS", snap.hints_used as u64);
        field(fb, &mut y, "SHUF", snap.shuffles_used as u64);

        fb.put_str(panel_x, y, "TIME", label);
        put_clock(fb, panel_x + 7, y, snap.elapsed_secs, value);
        y = y.saturating_add(1);
        field(fb, &mut y, "SEED", snap.seed as u64);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "AI", label);
        match adapter {
            Some(st) => {
                let end = fb.put_str(panel_x + 7, y, "ON ", value);
                fb.put_u64(end, y, st.client_count as u64, dim);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "CTRL", label);
                match st.controller_id {
                    Some(id) => fb.put_u64(panel_x + 7, y, id as u64, value),
                    None => fb.put_str(panel_x + 7, y, "-", value),
                };
            }
            None => {
                fb.put_str(panel_x + 7, y, "OFF", value);
            }
        }
        y = y.saturating_add(2);

        for line in HELP {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, dim);
            y = y.saturating_add(1);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        let text_w = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u16;
        let box_w = text_w + 4;
        let box_h = lines.len() as u16 + 2;
        let x = frame.x + frame.w.saturating_sub(box_w) / 2;
        let y = frame.y + frame.h.saturating_sub(box_h) / 2;
        fb.fill_rect(x, y, box_w, box_h, ' ', style);
        fb.draw_box(x, y, box_w, box_h, style);
        for (i, line) in lines.iter().enumerate() {
            let lw = line.chars().count() as u16;
            fb.put_str(x + (box_w - lw) / 2, y + 1 + i as u16, line, style);
        }
    }
}

const PANEL_W: u16 = 22;

const HELP: [&str; 6] = [
    "arrows move",
    "space  tap",
    "t/?    hint",
    "s      shuffle",
    "n      new  p pause",
    "q      quit",
];

/// Grid units spanned by the layout, tile footprint included.
fn layout_extent() -> (u16, u16) {
    let slots = turtle_layout();
    let cols = slots.iter().map(|p| p.col + TILE_SPAN).max().unwrap_or(0);
    let rows = slots.iter().map(|p| p.row + TILE_SPAN).max().unwrap_or(0);
    (cols.max(0) as u16, rows.max(0) as u16)
}

fn put_clock(fb: &mut FrameBuffer, x: u16, y: u16, secs: u64, style: CellStyle) {
    let x = fb.put_u64(x, y, secs / 60, style);
    fb.put_char(x, y, ':', style);
    let s = secs % 60;
    if s < 10 {
        fb.put_char(x + 1, y, '0', style);
        fb.put_u64(x + 2, y, s, style);
    } else {
        fb.put_u64(x + 1, y, s, style);
    }
}

fn suit_color(suit: Suit) -> Rgb {
    match suit {
        Suit::Circles => Rgb::new(30, 80, 190),
        Suit::Bamboo => Rgb::new(20, 120, 50),
        Suit::Chars => Rgb::new(180, 30, 30),
        Suit::Wind => Rgb::new(30, 30, 30),
        Suit::Dragon => Rgb::new(120, 30, 140),
        Suit::Flower => Rgb::new(190, 50, 130),
        Suit::Season => Rgb::new(190, 110, 10),
    }
}
