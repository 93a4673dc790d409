//! Static keyboard / pin-pad adjacency tables used by `is_walk`.
//!
//! Declared with `lazy_static!` as process-wide static lookup tables,
//! rather than rebuilding the grid on every call.

use fnv::FnvHashMap;
use lazy_static::lazy_static;

/// Horizontal and vertical adjacency for one keyboard/pin-pad layout.
/// Split the way the original keeps `HORIZONTAL_NO_SHIFT`/
/// `VERTICAL_NO_SHIFT` apart: a walk may step in either direction, but
/// callers that care about the axis (none currently do) can still tell
/// them apart.
#[derive(Debug)]
pub struct KeyboardLayout {
    horizontal: FnvHashMap<char, Vec<char>>,
    vertical: FnvHashMap<char, Vec<char>>,
}

impl KeyboardLayout {
    fn from_rows(rows: &[&str]) -> Self {
        let mut horizontal: FnvHashMap<char, Vec<char>> = FnvHashMap::default();
        let mut vertical: FnvHashMap<char, Vec<char>> = FnvHashMap::default();
        let grid: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();

        for (r, row) in grid.iter().enumerate() {
            for (c, &ch) in row.iter().enumerate() {
                let mut h = Vec::new();
                if c > 0 {
                    h.push(row[c - 1]);
                }
                if c + 1 < row.len() {
                    h.push(row[c + 1]);
                }
                horizontal.entry(ch).or_default().extend(h);

                let mut v = Vec::new();
                if r > 0 {
                    if let Some(&above) = grid[r - 1].get(c) {
                        v.push(above);
                    }
                }
                if let Some(below_row) = grid.get(r + 1) {
                    if let Some(&below) = below_row.get(c) {
                        v.push(below);
                    }
                }
                vertical.entry(ch).or_default().extend(v);
            }
        }

        KeyboardLayout { horizontal, vertical }
    }

    pub fn adjacent(&self, a: char, b: char) -> bool {
        let a = a.to_ascii_lowercase();
        let b = b.to_ascii_lowercase();
        self.horizontal.get(&a).map(|n| n.contains(&b)).unwrap_or(false)
            || self.vertical.get(&a).map(|n| n.contains(&b)).unwrap_or(false)
    }
}

lazy_static! {
    pub static ref KEYBOARD_DE: KeyboardLayout = KeyboardLayout::from_rows(&[
        "^1234567890ß",
        "qwertzuiopü",
        "asdfghjklöä",
        "yxcvbnm,.-",
    ]);
    pub static ref PIN_PAD: KeyboardLayout = KeyboardLayout::from_rows(&[
        "123",
        "456",
        "789",
        " 0 ",
    ]);
}

pub fn layout_by_name(name: &str) -> Option<&'static KeyboardLayout> {
    match name {
        "KEYBOARD_DE" => Some(&KEYBOARD_DE),
        "PIN_PAD" => Some(&PIN_PAD),
        _ => None,
    }
}

/// True iff `chars` can be split into one or more contiguous adjacent-pair
/// runs, where every run that ends because adjacency actually broke has
/// length at least `min_sub_walk` (rounded down); a run that instead reaches
/// the end of the string is never length-checked.
pub fn is_walk(chars: &[char], layout: &KeyboardLayout, min_sub_walk: usize) -> bool {
    fn rec(chars: &[char], layout: &KeyboardLayout, min_sub_walk: usize, start: usize, memo: &mut FnvHashMap<usize, bool>) -> bool {
        if start == chars.len() {
            return true;
        }
        if let Some(&cached) = memo.get(&start) {
            return cached;
        }
        let mut ok = false;
        let mut end = start + 1;
        while end < chars.len() && layout.adjacent(chars[end - 1], chars[end]) {
            end += 1;
            let seg_len = end - start;
            if seg_len >= min_sub_walk && rec(chars, layout, min_sub_walk, end, memo) {
                ok = true;
                break;
            }
        }
        // a run that reaches the end of the string is never length-checked:
        // the threshold only applies at an actual adjacency break.
        if !ok && end == chars.len() {
            ok = true;
        }
        memo.insert(start, ok);
        ok
    }

    let min_sub_walk = min_sub_walk.max(1);
    let mut memo = FnvHashMap::default();
    rec(chars, layout, min_sub_walk, 0, &mut memo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asdf_is_a_walk_on_keyboard_de() {
        let chars: Vec<char> = "asdf".chars().collect();
        assert!(is_walk(&chars, &KEYBOARD_DE, 3));
    }

    #[test]
    fn eight_w_one_is_not_a_walk() {
        let chars: Vec<char> = "8w1".chars().collect();
        assert!(!is_walk(&chars, &KEYBOARD_DE, 3));
    }

    #[test]
    fn trailing_short_run_is_not_length_checked() {
        // "asdf" (length 4, >= 3) breaks before "ui" (length 2, < 3), but the
        // trailing run reaches the end of the string and needs no threshold.
        let chars: Vec<char> = "asdfui".chars().collect();
        assert!(is_walk(&chars, &KEYBOARD_DE, 3));
    }
}
