//! The three shipped layouts as hand-tuned cost tables.
//!
//! Costs reflect row, column, and reach difficulty:
//!
//! Qwerty:
//! ```text
//! Q W E R T   Y U I O P
//!  A S D F G   H J K L ;
//!   Z X C V B   N M , . /
//! ```
//!
//! Ortholinear Colemak-DH:
//! ```text
//! Q W F P B   J L U Y ;
//! A R S T G   M N E I O
//! Z X C D V   K H , . /
//! ```

use crate::{CostModel, Finger, Hand, Key, KeyInfo, Weights, KEY_COUNT};

impl CostModel {
    /// Everything 1.0, modifiers free, no hand/finger assignment. Used for
    /// tests and as the neutral baseline.
    pub fn uniform() -> Self {
        let mut key_info = [KeyInfo::default(); KEY_COUNT];
        for info in &mut key_info {
            info.base_cost = 1.0;
        }
        for modifier in [Key::Shift, Key::Ctrl] {
            key_info[modifier.index()].base_cost = 0.0;
        }
        Self {
            key_info,
            weights: Weights::default(),
        }
    }

    pub fn qwerty() -> Self {
        let mut model = Self {
            key_info: [KeyInfo::default(); KEY_COUNT],
            weights: Weights::default(),
        };
        let mut set = |k: Key, h: Hand, f: Finger, cost: f64| {
            model.key_info[k.index()] = KeyInfo::new(h, f, cost);
        };

        // Left-hand letters
        set(Key::Q, Hand::Left, Finger::Lp, 2.4);
        set(Key::W, Hand::Left, Finger::Lr, 1.8);
        set(Key::E, Hand::Left, Finger::Lm, 1.4);
        set(Key::R, Hand::Left, Finger::Li, 1.4);
        set(Key::T, Hand::Left, Finger::Li, 1.8);

        set(Key::A, Hand::Left, Finger::Lp, 1.3);
        set(Key::S, Hand::Left, Finger::Lr, 1.2);
        set(Key::D, Hand::Left, Finger::Lm, 1.0);
        set(Key::F, Hand::Left, Finger::Li, 1.0);
        set(Key::G, Hand::Left, Finger::Li, 1.5);

        set(Key::Z, Hand::Left, Finger::Lp, 2.4);
        set(Key::X, Hand::Left, Finger::Lr, 1.8);
        set(Key::C, Hand::Left, Finger::Lm, 1.4);
        set(Key::V, Hand::Left, Finger::Li, 1.4);
        set(Key::B, Hand::Left, Finger::Li, 1.8);

        // Right-hand letters
        set(Key::Y, Hand::Right, Finger::Ri, 1.8);
        set(Key::U, Hand::Right, Finger::Ri, 1.4);
        set(Key::I, Hand::Right, Finger::Rm, 1.4);
        set(Key::O, Hand::Right, Finger::Rr, 1.8);
        set(Key::P, Hand::Right, Finger::Rp, 2.4);

        set(Key::H, Hand::Right, Finger::Ri, 1.5);
        set(Key::J, Hand::Right, Finger::Ri, 1.0);
        set(Key::K, Hand::Right, Finger::Rm, 1.0);
        set(Key::L, Hand::Right, Finger::Rr, 1.2);
        set(Key::Semicolon, Hand::Right, Finger::Rp, 1.2);

        set(Key::N, Hand::Right, Finger::Ri, 1.8);
        set(Key::M, Hand::Right, Finger::Ri, 1.4);
        set(Key::Comma, Hand::Right, Finger::Rm, 1.4);
        set(Key::Period, Hand::Right, Finger::Rr, 1.8);
        set(Key::Slash, Hand::Right, Finger::Rp, 2.4);

        // Number row
        set(Key::Num1, Hand::Left, Finger::Lp, 2.6);
        set(Key::Num2, Hand::Left, Finger::Lr, 2.2);
        set(Key::Num3, Hand::Left, Finger::Lm, 2.0);
        set(Key::Num4, Hand::Left, Finger::Li, 2.0);
        set(Key::Num5, Hand::Left, Finger::Li, 2.2);

        set(Key::Num6, Hand::Right, Finger::Ri, 2.2);
        set(Key::Num7, Hand::Right, Finger::Ri, 2.0);
        set(Key::Num8, Hand::Right, Finger::Rm, 2.0);
        set(Key::Num9, Hand::Right, Finger::Rr, 2.2);
        set(Key::Num0, Hand::Right, Finger::Rp, 2.6);

        set(Key::Grave, Hand::Left, Finger::Lp, 3.0);
        set(Key::Minus, Hand::Right, Finger::Rp, 3.0);
        set(Key::Equal, Hand::Right, Finger::Rp, 3.0);

        // Main punctuation keys
        set(Key::LBracket, Hand::Right, Finger::Rp, 2.5);
        set(Key::RBracket, Hand::Right, Finger::Rp, 2.5);
        set(Key::Backslash, Hand::Right, Finger::Rp, 3.0);
        set(Key::Apostrophe, Hand::Right, Finger::Rp, 1.8);

        set(Key::Esc, Hand::Left, Finger::Lp, 1.2);
        set(Key::Tab, Hand::Left, Finger::Lp, 2.5);
        set(Key::Enter, Hand::Right, Finger::Rp, 2.5);
        set(Key::Backspace, Hand::Right, Finger::Rp, 3.0);
        set(Key::Space, Hand::Right, Finger::Rt, 0.8);
        set(Key::Delete, Hand::Right, Finger::Ri, 3.0);

        set(Key::Ctrl, Hand::Left, Finger::Lp, 2.5);
        set(Key::Shift, Hand::Left, Finger::Lp, 1.2);

        set(Key::Home, Hand::Right, Finger::Ri, 3.0);
        set(Key::End, Hand::Right, Finger::Ri, 3.0);

        set(Key::Left, Hand::Right, Finger::Rr, 3.0);
        set(Key::Down, Hand::Right, Finger::Rm, 3.0);
        set(Key::Right, Hand::Right, Finger::Ri, 3.0);
        set(Key::Up, Hand::Right, Finger::Rm, 3.0);

        model
    }

    pub fn colemak_dh() -> Self {
        let mut model = Self {
            key_info: [KeyInfo::default(); KEY_COUNT],
            weights: Weights::default(),
        };
        let mut set = |k: Key, h: Hand, f: Finger, cost: f64| {
            model.key_info[k.index()] = KeyInfo::new(h, f, cost);
        };

        // Left-hand letters
        set(Key::Q, Hand::Left, Finger::Lp, 2.2);
        set(Key::W, Hand::Left, Finger::Lr, 1.7);
        set(Key::F, Hand::Left, Finger::Lm, 1.3);
        set(Key::P, Hand::Left, Finger::Li, 1.3);
        set(Key::B, Hand::Left, Finger::Li, 1.6);

        set(Key::A, Hand::Left, Finger::Lp, 1.3);
        set(Key::R, Hand::Left, Finger::Lr, 1.2);
        set(Key::S, Hand::Left, Finger::Lm, 1.0);
        set(Key::T, Hand::Left, Finger::Li, 1.0);
        set(Key::G, Hand::Left, Finger::Li, 1.5);

        set(Key::Z, Hand::Left, Finger::Lp, 2.2);
        set(Key::X, Hand::Left, Finger::Lr, 1.7);
        set(Key::C, Hand::Left, Finger::Lm, 1.3);
        set(Key::D, Hand::Left, Finger::Li, 1.3);
        set(Key::V, Hand::Left, Finger::Li, 1.6);

        // Right-hand letters
        set(Key::J, Hand::Right, Finger::Ri, 1.6);
        set(Key::L, Hand::Right, Finger::Ri, 1.3);
        set(Key::U, Hand::Right, Finger::Rm, 1.3);
        set(Key::Y, Hand::Right, Finger::Rr, 1.7);
        set(Key::Semicolon, Hand::Right, Finger::Rp, 2.2);

        set(Key::M, Hand::Right, Finger::Ri, 1.5);
        set(Key::N, Hand::Right, Finger::Ri, 1.0);
        set(Key::E, Hand::Right, Finger::Rm, 1.0);
        set(Key::I, Hand::Right, Finger::Rr, 1.2);
        set(Key::O, Hand::Right, Finger::Rp, 1.3);

        set(Key::K, Hand::Right, Finger::Ri, 1.6);
        set(Key::H, Hand::Right, Finger::Ri, 1.3);
        set(Key::Comma, Hand::Right, Finger::Rm, 1.3);
        set(Key::Period, Hand::Right, Finger::Rr, 1.7);
        set(Key::Slash, Hand::Right, Finger::Rp, 2.2);

        // Number row
        set(Key::Num1, Hand::Left, Finger::Lp, 2.2);
        set(Key::Num2, Hand::Left, Finger::Lr, 2.0);
        set(Key::Num3, Hand::Left, Finger::Lm, 1.7);
        set(Key::Num4, Hand::Left, Finger::Li, 1.7);
        set(Key::Num5, Hand::Left, Finger::Li, 2.0);

        set(Key::Num6, Hand::Right, Finger::Ri, 2.2);
        set(Key::Num7, Hand::Right, Finger::Ri, 1.7);
        set(Key::Num8, Hand::Right, Finger::Rm, 1.7);
        set(Key::Num9, Hand::Right, Finger::Rr, 2.0);
        set(Key::Num0, Hand::Right, Finger::Rp, 2.2);

        set(Key::Grave, Hand::Left, Finger::Li, 2.8);
        set(Key::Minus, Hand::Right, Finger::Rp, 2.5);
        set(Key::Equal, Hand::Left, Finger::Li, 2.5);

        // Main punctuation keys
        set(Key::LBracket, Hand::Right, Finger::Rp, 1.5);
        set(Key::RBracket, Hand::Right, Finger::Rp, 1.5);
        set(Key::Backslash, Hand::Right, Finger::Rp, 3.0);
        set(Key::Apostrophe, Hand::Right, Finger::Rp, 1.8);

        set(Key::Esc, Hand::Left, Finger::Lp, 1.2);
        set(Key::Tab, Hand::Left, Finger::Lp, 1.8);
        set(Key::Enter, Hand::Right, Finger::Rp, 1.0);
        set(Key::Backspace, Hand::Right, Finger::Rp, 0.8);
        set(Key::Space, Hand::Right, Finger::Lt, 0.8);
        set(Key::Delete, Hand::Right, Finger::Ri, 2.5);

        set(Key::Ctrl, Hand::Left, Finger::Lp, 1.2);
        set(Key::Shift, Hand::Left, Finger::Lp, 1.2);

        set(Key::Home, Hand::Right, Finger::Ri, 3.0);
        set(Key::End, Hand::Right, Finger::Ri, 3.0);

        set(Key::Left, Hand::Right, Finger::Rr, 2.0);
        set(Key::Down, Hand::Right, Finger::Rm, 1.7);
        set(Key::Right, Hand::Right, Finger::Ri, 1.7);
        set(Key::Up, Hand::Right, Finger::Rm, 2.0);

        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_prices_modifiers_free() {
        let m = CostModel::uniform();
        assert_eq!(m.info(Key::Shift).base_cost, 0.0);
        assert_eq!(m.info(Key::Ctrl).base_cost, 0.0);
        assert_eq!(m.info(Key::W).base_cost, 1.0);
        assert!(m.info(Key::W).hand.is_none());
    }

    #[test]
    fn layouts_assign_every_key() {
        for model in [CostModel::qwerty(), CostModel::colemak_dh()] {
            for key in Key::ALL {
                let info = model.info(key);
                assert!(info.hand.is_some(), "{key:?} missing hand");
                assert!(info.finger.is_some(), "{key:?} missing finger");
                assert!(info.base_cost > 0.0, "{key:?} missing cost");
            }
        }
    }

    #[test]
    fn home_row_is_cheapest_row_on_qwerty() {
        let m = CostModel::qwerty();
        assert!(m.info(Key::F).base_cost < m.info(Key::R).base_cost);
        assert!(m.info(Key::J).base_cost < m.info(Key::N).base_cost);
    }
}
