//! Physical keyboard model: the closed set of keys, hand/finger metadata,
//! per-layout base costs, and the scoring weights the effort accumulator
//! consumes.
//!
//! A command string like `"2e"` or `"ci("` is *semantic*; what the fingers do
//! is a [`KeySeq`] of physical keys (with explicit `Shift`/`Ctrl` strokes).
//! The [`SequenceTokenizer`] bridges the two.

pub mod layout;
pub mod tables;
pub mod tokenizer;

pub use tokenizer::{SequenceTokenizer, TokenizeError};

use smallvec::SmallVec;

/// A sequence of physical key presses. Most command tokens expand to one or
/// two keys, so the inline capacity covers the common case.
pub type KeySeq = SmallVec<[Key; 2]>;

/// Number of physical keys in the model.
pub const KEY_COUNT: usize = 61;

/// Consecutive same-hand strokes beyond this threshold incur the run penalty.
pub const RUN_THRESHOLD: u32 = 4;

/// The closed set of physical keys. Discriminants double as indexes into the
/// per-layout cost table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Key {
    Q, W, E, R, T, Y, U, I, O, P,
    A, S, D, F, G, H, J, K, L, Semicolon,
    Z, X, C, V, B, N, M, Comma, Period, Slash,
    Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9, Num0,
    Grave, Minus, Equal, LBracket, RBracket, Backslash, Apostrophe,
    Esc, Tab, Enter, Backspace, Space, Delete,
    Ctrl, Shift,
    Home, End,
    Left, Down, Up, Right,
}

impl Key {
    /// Every key, in discriminant order.
    #[rustfmt::skip]
    pub const ALL: [Key; KEY_COUNT] = [
        Key::Q, Key::W, Key::E, Key::R, Key::T, Key::Y, Key::U, Key::I, Key::O, Key::P,
        Key::A, Key::S, Key::D, Key::F, Key::G, Key::H, Key::J, Key::K, Key::L, Key::Semicolon,
        Key::Z, Key::X, Key::C, Key::V, Key::B, Key::N, Key::M, Key::Comma, Key::Period, Key::Slash,
        Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5, Key::Num6, Key::Num7, Key::Num8,
        Key::Num9, Key::Num0,
        Key::Grave, Key::Minus, Key::Equal, Key::LBracket, Key::RBracket, Key::Backslash,
        Key::Apostrophe,
        Key::Esc, Key::Tab, Key::Enter, Key::Backspace, Key::Space, Key::Delete,
        Key::Ctrl, Key::Shift,
        Key::Home, Key::End,
        Key::Left, Key::Down, Key::Up, Key::Right,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

/// Fingers in keyboard order, left pinky through right pinky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Lp,
    Lr,
    Lm,
    Li,
    Lt,
    Rt,
    Ri,
    Rm,
    Rr,
    Rp,
}

/// Column of a finger on its hand, pinky (outer) through thumb (inner).
/// Rolls are judged by movement along this axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FingerPosition {
    Pinky = 0,
    Ring = 1,
    Middle = 2,
    Index = 3,
    Thumb = 4,
}

impl Finger {
    pub fn hand(self) -> Hand {
        match self {
            Finger::Lp | Finger::Lr | Finger::Lm | Finger::Li | Finger::Lt => Hand::Left,
            Finger::Rt | Finger::Ri | Finger::Rm | Finger::Rr | Finger::Rp => Hand::Right,
        }
    }

    pub fn position(self) -> FingerPosition {
        match self {
            Finger::Lp | Finger::Rp => FingerPosition::Pinky,
            Finger::Lr | Finger::Rr => FingerPosition::Ring,
            Finger::Lm | Finger::Rm => FingerPosition::Middle,
            Finger::Li | Finger::Ri => FingerPosition::Index,
            Finger::Lt | Finger::Rt => FingerPosition::Thumb,
        }
    }
}

/// Per-key metadata under one layout. Keys without hand/finger assignment
/// (the uniform layout) never trigger bigram terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyInfo {
    pub hand: Option<Hand>,
    pub finger: Option<Finger>,
    pub base_cost: f64,
}

impl KeyInfo {
    pub fn new(hand: Hand, finger: Finger, base_cost: f64) -> Self {
        Self {
            hand: Some(hand),
            finger: Some(finger),
            base_cost,
        }
    }
}

/// Scoring weights. Signs are policy: negative values reward a pattern
/// (alternation, inward rolls); the invariant is only that a higher total
/// means worse.
#[derive(Debug, Clone, Copy)]
pub struct Weights {
    /// Base key cost multiplier.
    pub key: f64,
    /// Consecutive strokes on the same finger.
    pub same_finger: f64,
    /// Same-key repeats. Counter to traditional typing wisdom, repeats are
    /// easy to execute, so the default rewards them.
    pub same_key: f64,
    /// Hand alternation.
    pub alternation: f64,
    /// Penalty per stroke beyond [`RUN_THRESHOLD`] on one hand.
    pub run_penalty: f64,
    /// Inward (outer finger to inner finger) rolls.
    pub roll_good: f64,
    /// Outward rolls.
    pub roll_bad: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            key: 1.0,
            same_finger: 0.0,
            same_key: -0.2,
            alternation: -0.1,
            run_penalty: 0.0,
            roll_good: -0.2,
            roll_bad: 0.2,
        }
    }
}

/// A complete cost model: one named layout's per-key table plus weights.
/// Immutable for the duration of an analysis; cloned and tweaked by tests and
/// the embedding API.
#[derive(Debug, Clone)]
pub struct CostModel {
    pub key_info: [KeyInfo; KEY_COUNT],
    pub weights: Weights,
}

impl CostModel {
    pub fn info(&self, key: Key) -> &KeyInfo {
        &self.key_info[key.index()]
    }

    pub fn set_key(&mut self, key: Key, info: KeyInfo) {
        self.key_info[key.index()] = info;
    }
}
