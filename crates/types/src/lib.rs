//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, control protocol).
//!
//! # Deck Composition
//!
//! | Suit | Ranks | Copies | Tiles | Match group |
//! |------|-------|--------|-------|-------------|
//! | circles | 9 | 4 | 36 | `circles-{rank}` |
//! | bamboo | 9 | 4 | 36 | `bamboo-{rank}` |
//! | chars | 9 | 4 | 36 | `chars-{rank}` |
//! | wind | 4 | 4 | 16 | `wind-{rank}` |
//! | dragon | 3 | 4 | 12 | `dragon-{rank}` |
//! | flower | 4 | 1 | 4 | `flower` |
//! | season | 4 | 1 | 4 | `season` |
//!
//! # Grid Geometry
//!
//! Every tile covers a `TILE_SPAN x TILE_SPAN` footprint of grid units, so a
//! tile at `(col, row)` occupies `[col, col+2) x [row, row+2)`. Offsetting a
//! tile by one unit places it half a tile over its neighbours.
//!
//! # Examples
//!
//! ```
//! use mahjong_types::{MatchGroup, Suit, TileFace, DECK_SIZE};
//!
//! let a = TileFace::new(Suit::Bamboo, 2);
//! let b = TileFace::new(Suit::Bamboo, 2);
//! assert_eq!(a.match_group(), b.match_group());
//! assert_eq!(a.match_group().to_string(), "bamboo-2");
//!
//! // Any flower pairs with any other flower.
//! let plum = TileFace::new(Suit::Flower, 0);
//! let orchid = TileFace::new(Suit::Flower, 1);
//! assert_eq!(plum.match_group(), MatchGroup::Flower);
//! assert_eq!(plum.match_group(), orchid.match_group());
//!
//! assert_eq!(DECK_SIZE, 144);
//! ```

use std::fmt;

/// Number of tiles in a full deck (and slots in a layout).
pub const DECK_SIZE: usize = 144;

/// Width and height of a tile footprint in grid units.
pub const TILE_SPAN: i16 = 2;

/// Highest layer index produced by the turtle layout.
pub const MAX_LAYER: u8 = 4;

/// Reshuffle attempts made at game start before giving up on a legal first move.
pub const SHUFFLE_RETRY_LIMIT: u32 = 20;

/// Copies of each numbered, wind and dragon face in the deck.
pub const COPIES_PER_FACE: usize = 4;

/// Fixed timestep interval of the front-end loop in milliseconds.
pub const TICK_MS: u32 = 16;

/// How long the front end keeps a hint highlighted.
pub const HINT_DISPLAY_MS: u32 = 3000;

/// Stable identifier of a tile: its index in the board arena.
pub type TileId = usize;


/// The seven tile suits
///
/// - **Circles / Bamboo / Chars**: numbered suits, ranks 0-8
/// - **Wind**: East, South, West, North (ranks 0-3)
/// - **Dragon**: Red, Green, White (ranks 0-2)
/// - **Flower / Season**: bonus suits with one tile per rank (0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Circles,
    Bamboo,
    Chars,
    Wind,
    Dragon,
    Flower,
    Season,
}

impl Suit {
    /// All suits in deck construction order.
    pub const ALL: [Suit; 7] = [
        Suit::Circles,
        Suit::Bamboo,
        Suit::Chars,
        Suit::Wind,
        Suit::Dragon,
        Suit::Flower,
        Suit::Season,
    ];

    /// Number of distinct ranks in this suit.
    pub const fn rank_count(self) -> u8 {
        match self {
            Suit::Circles | Suit::Bamboo | Suit::Chars => 9,
            Suit::Wind | Suit::Flower | Suit::Season => 4,
            Suit::Dragon => 3,
        }
    }

    /// Copies of each rank in the deck.
    pub const fn copies(self) -> usize {
        match self {
            Suit::Flower | Suit::Season => 1,
            _ => COPIES_PER_FACE,
        }
    }

    /// Bonus suits pair on suit alone.
    pub const fn is_bonus(self) -> bool {
        matches!(self, Suit::Flower | Suit::Season)
    }

    /// Parse suit from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use mahjong_types::Suit;
    ///
    /// assert_eq!(Suit::from_str("bamboo"), Some(Suit::Bamboo));
    /// assert_eq!(Suit::from_str("Dragon"), Some(Suit::Dragon));
    /// assert_eq!(Suit::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "circles" => Some(Suit::Circles),
            "bamboo" => Some(Suit::Bamboo),
            "chars" => Some(Suit::Chars),
            "wind" => Some(Suit::Wind),
            "dragon" => Some(Suit::Dragon),
            "flower" => Some(Suit::Flower),
            "season" => Some(Suit::Season),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Circles => "circles",
            Suit::Bamboo => "bamboo",
            Suit::Chars => "chars",
            Suit::Wind => "wind",
            Suit::Dragon => "dragon",
            Suit::Flower => "flower",
            Suit::Season => "season",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equivalence class deciding which tiles pair.
///
/// Numbered suits, winds and dragons pair on exact identity; every flower
/// pairs with every other flower, and likewise for seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchGroup {
    Suited { suit: Suit, rank: u8 },
    Flower,
    Season,
}

impl fmt::Display for MatchGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchGroup::Suited { suit, rank } => write!(f, "{}-{}", suit, rank),
            MatchGroup::Flower => f.write_str("flower"),
            MatchGroup::Season => f.write_str("season"),
        }
    }
}

const NUMBER_LABELS: [[&str; 9]; 3] = [
    [
        "1 Circles", "2 Circles", "3 Circles", "4 Circles", "5 Circles", "6 Circles",
        "7 Circles", "8 Circles", "9 Circles",
    ],
    [
        "1 Bamboo", "2 Bamboo", "3 Bamboo", "4 Bamboo", "5 Bamboo", "6 Bamboo", "7 Bamboo",
        "8 Bamboo", "9 Bamboo",
    ],
    [
        "1 Chars", "2 Chars", "3 Chars", "4 Chars", "5 Chars", "6 Chars", "7 Chars", "8 Chars",
        "9 Chars",
    ],
];
const WIND_LABELS: [&str; 4] = ["East Wind", "South Wind", "West Wind", "North Wind"];
const DRAGON_LABELS: [&str; 3] = ["Red Dragon", "Green Dragon", "White Dragon"];
const FLOWER_LABELS: [&str; 4] = ["Plum", "Orchid", "Bamboo Flower", "Chrysanthemum"];
const SEASON_LABELS: [&str; 4] = ["Spring", "Summer", "Autumn", "Winter"];

/// Identity data of a tile: everything a shuffle may reassign.
///
/// Match group, icon and label are derived from `(suit, rank)`, so moving a
/// face between tiles moves all identity fields together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileFace {
    pub suit: Suit,
    pub rank: u8,
}

impl TileFace {
    pub const fn new(suit: Suit, rank: u8) -> Self {
        Self { suit, rank }
    }

    pub fn match_group(&self) -> MatchGroup {
        match self.suit {
            Suit::Flower => MatchGroup::Flower,
            Suit::Season => MatchGroup::Season,
            suit => MatchGroup::Suited {
                suit,
                rank: self.rank,
            },
        }
    }

    /// Whether two faces form a legal pair.
    pub fn matches(&self, other: &TileFace) -> bool {
        self.match_group() == other.match_group()
    }

    /// Glyph from the Unicode "Mahjong Tiles" block.
    pub fn icon(&self) -> char {
        let offset = match self.suit {
            Suit::Wind => self.rank as u32,
            Suit::Dragon => 0x04 + self.rank as u32,
            Suit::Chars => 0x07 + self.rank as u32,
            Suit::Bamboo => 0x10 + self.rank as u32,
            Suit::Circles => 0x19 + self.rank as u32,
            Suit::Flower => 0x22 + self.rank as u32,
            Suit::Season => 0x26 + self.rank as u32,
        };
        char::from_u32(0x1F000 + offset).unwrap_or('?')
    }

    /// Human readable name, e.g. `"3 Bamboo"` or `"East Wind"`.
    pub fn label(&self) -> &'static str {
        let r = self.rank as usize;
        let table: &[&'static str] = match self.suit {
            Suit::Circles => &NUMBER_LABELS[0],
            Suit::Bamboo => &NUMBER_LABELS[1],
            Suit::Chars => &NUMBER_LABELS[2],
            Suit::Wind => &WIND_LABELS,
            Suit::Dragon => &DRAGON_LABELS,
            Suit::Flower => &FLOWER_LABELS,
            Suit::Season => &SEASON_LABELS,
        };
        table.get(r).copied().unwrap_or("?")
    }

    /// Two-character code for narrow displays (`"3b"`, `"Ew"`, `"Rd"`, `"F2"`).
    pub fn short_code(&self) -> [char; 2] {
        const WINDS: [char; 4] = ['E', 'S', 'W', 'N'];
        const DRAGONS: [char; 3] = ['R', 'G', 'W'];
        let digit = |n: u8| char::from_digit(n as u32 + 1, 10).unwrap_or('?');
        match self.suit {
            Suit::Circles => [digit(self.rank), 'c'],
            Suit::Bamboo => [digit(self.rank), 'b'],
            Suit::Chars => [digit(self.rank), 'm'],
            Suit::Wind => [WINDS.get(self.rank as usize).copied().unwrap_or('?'), 'w'],
            Suit::Dragon => [DRAGONS.get(self.rank as usize).copied().unwrap_or('?'), 'd'],
            Suit::Flower => ['F', digit(self.rank)],
            Suit::Season => ['S', digit(self.rank)],
        }
    }
}

/// A layout slot. Grid units are half a tile wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: i16,
    pub row: i16,
    pub layer: u8,
}

impl Position {
    pub const fn new(col: i16, row: i16, layer: u8) -> Self {
        Self { col, row, layer }
    }

    /// Half-open footprint intersection on the grid (layers ignored).
    #[inline]
    pub fn overlaps(&self, other: &Position) -> bool {
        other.col < self.col + TILE_SPAN
            && other.col + TILE_SPAN > self.col
            && self.rows_overlap(other)
    }

    /// Whether the two footprints share any row span.
    #[inline]
    pub fn rows_overlap(&self, other: &Position) -> bool {
        other.row < self.row + TILE_SPAN && other.row + TILE_SPAN > self.row
    }
}

/// Result of a tile tap.
///
/// The front end animates on the variant; the adapter reports `kind()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Tile became the selection.
    Select(TileId),
    /// The selected tile was tapped again.
    Deselect(TileId),
    /// Selection moved to a non-matching free tile.
    Switch { prev: TileId, tile: TileId },
    /// Pair removed, tiles remain.
    Match(TileId, TileId),
    /// Last pair removed.
    Win(TileId, TileId),
}

impl TapOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            TapOutcome::Select(_) => "select",
            TapOutcome::Deselect(_) => "deselect",
            TapOutcome::Switch { .. } => "switch",
            TapOutcome::Match(..) => "match",
            TapOutcome::Win(..) => "win",
        }
    }

    /// The removed pair, if the tap removed one.
    pub fn pair(&self) -> Option<(TileId, TileId)> {
        match *self {
            TapOutcome::Match(a, b) | TapOutcome::Win(a, b) => Some((a, b)),
            _ => None,
        }
    }
}

/// Player actions produced by the key map and the control protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the board cursor one tile left
    CursorLeft,
    /// Move the board cursor one tile right
    CursorRight,
    /// Move the board cursor one tile up
    CursorUp,
    /// Move the board cursor one tile down
    CursorDown,
    /// Tap the tile under the cursor
    Tap,
    /// Highlight a legal pair
    Hint,
    /// Reshuffle the remaining tiles
    Shuffle,
    /// Deal a new game
    NewGame,
    /// Toggle pause state
    Pause,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use mahjong_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("hint"), Some(GameAction::Hint));
    /// assert_eq!(GameAction::from_str("newGame"), Some(GameAction::NewGame));
    /// assert_eq!(GameAction::from_str("new_game"), Some(GameAction::NewGame));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "cursorleft" => Some(GameAction::CursorLeft),
            "cursorright" => Some(GameAction::CursorRight),
            "cursorup" => Some(GameAction::CursorUp),
            "cursordown" => Some(GameAction::CursorDown),
            "tap" => Some(GameAction::Tap),
            "hint" => Some(GameAction::Hint),
            "shuffle" => Some(GameAction::Shuffle),
            "newgame" => Some(GameAction::NewGame),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::CursorLeft => "cursorLeft",
            GameAction::CursorRight => "cursorRight",
            GameAction::CursorUp => "cursorUp",
            GameAction::CursorDown => "cursorDown",
            GameAction::Tap => "tap",
            GameAction::Hint => "hint",
            GameAction::Shuffle => "shuffle",
            GameAction::NewGame => "newGame",
            GameAction::Pause => "pause",
        }
    }
}
