//! Mappings from command-string tokens to physical key sequences.
//!
//! Single printable characters map to one or two keys (shifted characters
//! press `Shift` explicitly). Bracketed names (`<Esc>`, `<C-u>`, ...) follow
//! the editor's key notation. A literal `<` must be written `<LT>` in command
//! contexts so it cannot be confused with the opening of a bracketed name;
//! [`char_keys`] still maps the real `<` character for buffer text.

use crate::{Key, KeySeq};
use smallvec::smallvec;
use std::collections::BTreeMap;

/// Motion-name to key-sequence table used by the movement search. Ordered so
/// exploration is deterministic.
pub type MotionTable = BTreeMap<&'static str, KeySeq>;

fn letter_key(c: char) -> Key {
    match c {
        'a' => Key::A,
        'b' => Key::B,
        'c' => Key::C,
        'd' => Key::D,
        'e' => Key::E,
        'f' => Key::F,
        'g' => Key::G,
        'h' => Key::H,
        'i' => Key::I,
        'j' => Key::J,
        'k' => Key::K,
        'l' => Key::L,
        'm' => Key::M,
        'n' => Key::N,
        'o' => Key::O,
        'p' => Key::P,
        'q' => Key::Q,
        'r' => Key::R,
        's' => Key::S,
        't' => Key::T,
        'u' => Key::U,
        'v' => Key::V,
        'w' => Key::W,
        'x' => Key::X,
        'y' => Key::Y,
        'z' => Key::Z,
        _ => unreachable!("not a lowercase letter: {c:?}"),
    }
}

fn digit_key(c: char) -> Key {
    match c {
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        _ => unreachable!("not a digit: {c:?}"),
    }
}

/// Physical keys for one printable character, `None` for characters outside
/// the 61-key model (non-ASCII, control characters).
pub fn char_keys(c: char) -> Option<KeySeq> {
    let keys: KeySeq = match c {
        'a'..='z' => smallvec![letter_key(c)],
        'A'..='Z' => smallvec![Key::Shift, letter_key(c.to_ascii_lowercase())],
        '0'..='9' => smallvec![digit_key(c)],

        ' ' => smallvec![Key::Space],
        '\t' => smallvec![Key::Tab],
        '\n' | '\r' => smallvec![Key::Enter],

        // Top-row punctuation and shifted forms
        '`' => smallvec![Key::Grave],
        '~' => smallvec![Key::Shift, Key::Grave],
        '-' => smallvec![Key::Minus],
        '_' => smallvec![Key::Shift, Key::Minus],
        '=' => smallvec![Key::Equal],
        '+' => smallvec![Key::Shift, Key::Equal],
        '[' => smallvec![Key::LBracket],
        '{' => smallvec![Key::Shift, Key::LBracket],
        ']' => smallvec![Key::RBracket],
        '}' => smallvec![Key::Shift, Key::RBracket],
        '\\' => smallvec![Key::Backslash],
        '|' => smallvec![Key::Shift, Key::Backslash],

        // Main-row punctuation
        ';' => smallvec![Key::Semicolon],
        ':' => smallvec![Key::Shift, Key::Semicolon],
        '\'' => smallvec![Key::Apostrophe],
        '"' => smallvec![Key::Shift, Key::Apostrophe],
        ',' => smallvec![Key::Comma],
        '<' => smallvec![Key::Shift, Key::Comma],
        '.' => smallvec![Key::Period],
        '>' => smallvec![Key::Shift, Key::Period],
        '/' => smallvec![Key::Slash],
        '?' => smallvec![Key::Shift, Key::Slash],

        // Shifted digits
        '!' => smallvec![Key::Shift, Key::Num1],
        '@' => smallvec![Key::Shift, Key::Num2],
        '#' => smallvec![Key::Shift, Key::Num3],
        '$' => smallvec![Key::Shift, Key::Num4],
        '%' => smallvec![Key::Shift, Key::Num5],
        '^' => smallvec![Key::Shift, Key::Num6],
        '&' => smallvec![Key::Shift, Key::Num7],
        '*' => smallvec![Key::Shift, Key::Num8],
        '(' => smallvec![Key::Shift, Key::Num9],
        ')' => smallvec![Key::Shift, Key::Num0],

        _ => return None,
    };
    Some(keys)
}

/// Physical keys for a whole string of printable characters. `None` if any
/// character falls outside the model.
pub fn string_keys(s: &str) -> Option<KeySeq> {
    let mut out = KeySeq::new();
    for c in s.chars() {
        out.extend(char_keys(c)?);
    }
    Some(out)
}

/// Bracketed special-key names (`:h key-notation`).
const BRACKETED: &[(&str, &[Key])] = &[
    ("<Space>", &[Key::Space]),
    ("<Tab>", &[Key::Tab]),
    ("<CR>", &[Key::Enter]),
    ("<Enter>", &[Key::Enter]),
    ("<Return>", &[Key::Enter]),
    ("<Esc>", &[Key::Esc]),
    ("<BS>", &[Key::Backspace]),
    ("<Del>", &[Key::Delete]),
    ("<Up>", &[Key::Up]),
    ("<Down>", &[Key::Down]),
    ("<Left>", &[Key::Left]),
    ("<Right>", &[Key::Right]),
    ("<Home>", &[Key::Home]),
    ("<End>", &[Key::End]),
    ("<C-Space>", &[Key::Ctrl, Key::Space]),
    ("<C-BS>", &[Key::Ctrl, Key::Backspace]),
    ("<C-CR>", &[Key::Ctrl, Key::Enter]),
    ("<C-Tab>", &[Key::Ctrl, Key::Tab]),
];

/// Every token the tokenizer understands mapped to its keys: printable
/// characters (with `<LT>` standing in for `<`), bracketed names, and
/// `<C-a>`..`<C-z>` chords.
pub fn action_tokens() -> Vec<(String, KeySeq)> {
    let mut out = Vec::new();

    let printable = ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .chain(" \t\n\r".chars())
        .chain("`~-_=+[{]}\\|;:'\",.>/?!@#$%^&*()".chars());
    for c in printable {
        let keys = char_keys(c).expect("printable characters are in the model");
        out.push((c.to_string(), keys));
    }
    // Literal '<' is spelled <LT> in command strings.
    out.push(("<LT>".to_string(), smallvec![Key::Shift, Key::Comma]));

    for (token, keys) in BRACKETED {
        out.push((token.to_string(), KeySeq::from_slice(keys)));
    }
    for c in 'a'..='z' {
        out.push((format!("<C-{c}>"), smallvec![Key::Ctrl, letter_key(c)]));
    }

    out
}

/// The motions the movement optimizer explores by default.
pub fn explorable_motions() -> MotionTable {
    let mut m = MotionTable::new();
    let mut ins = |name: &'static str, keys: KeySeq| {
        m.insert(name, keys);
    };

    ins("h", smallvec![Key::H]);
    ins("j", smallvec![Key::J]);
    ins("k", smallvec![Key::K]);
    ins("l", smallvec![Key::L]);

    ins("0", smallvec![Key::Num0]);
    ins("^", smallvec![Key::Shift, Key::Num6]);
    ins("$", smallvec![Key::Shift, Key::Num4]);

    ins("w", smallvec![Key::W]);
    ins("b", smallvec![Key::B]);
    ins("e", smallvec![Key::E]);
    ins("W", smallvec![Key::Shift, Key::W]);
    ins("B", smallvec![Key::Shift, Key::B]);
    ins("E", smallvec![Key::Shift, Key::E]);
    ins("ge", smallvec![Key::G, Key::E]);
    ins("gE", smallvec![Key::G, Key::Shift, Key::E]);

    ins("gg", smallvec![Key::G, Key::G]);
    ins("G", smallvec![Key::Shift, Key::G]);

    ins("{", smallvec![Key::Shift, Key::LBracket]);
    ins("}", smallvec![Key::Shift, Key::RBracket]);
    ins("(", smallvec![Key::Shift, Key::Num9]);
    ins(")", smallvec![Key::Shift, Key::Num0]);

    m
}

/// Restrict the explorable set to the named motions. Unknown names are
/// skipped with a debug note.
pub fn sliced_motions(names: &[&'static str]) -> MotionTable {
    let all = explorable_motions();
    let mut out = MotionTable::new();
    for name in names {
        match all.get(name) {
            Some(keys) => {
                out.insert(name, keys.clone());
            }
            None => tracing::debug!(target: "keyboard.tables", motion = name, "unknown motion"),
        }
    }
    out
}
