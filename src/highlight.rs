//! Highlighter and warning-prompt driver (§4.5).
//!
//! Grounded on `change_word_color` / `turn_it_wrong` / `print_warning_prompt`
//! in `original_source/src/suggestions.c` for the save/restore-prompt-string
//! behavior; generalized into the per-grapheme diff cache §9 calls for
//! ("Highlighter reuse across ticks") since the original recolors
//! unconditionally on every keystroke.

use crate::classifier::Color;

/// Tracks the previous frame's color array and the prompt swap state so the
/// render layer only rewrites graphemes whose color actually changed.
#[derive(Debug, Default)]
pub struct Highlighter {
    prev_colors: Vec<Color>,
    warning_active: bool,
    saved_prompt: Option<String>,
}

/// One position whose color changed since the last tick, for a minimal
/// redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDiff {
    pub grapheme_index: usize,
    pub color: Color,
}

impl Highlighter {
    pub fn new() -> Self {
        Highlighter::default()
    }

    /// Diff `colors` (this tick's array) against the previous tick, returning
    /// only the positions that changed. Always returns every position the
    /// first time (empty previous array) or when the length changed, since a
    /// length change invalidates any positional assumption.
    pub fn diff(&mut self, colors: &[Color]) -> Vec<ColorDiff> {
        let mut changes = Vec::new();
        if colors.len() != self.prev_colors.len() {
            changes.extend(
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, &color)| ColorDiff { grapheme_index: i, color }),
            );
        } else {
            for (i, (&new, &old)) in colors.iter().zip(self.prev_colors.iter()).enumerate() {
                if new != old {
                    changes.push(ColorDiff { grapheme_index: i, color: new });
                }
            }
        }
        self.prev_colors = colors.to_vec();
        changes
    }

    /// Call once per tick with the current `wrong_cmd` state and the two
    /// configured prompt strings. Returns the prompt string that should be
    /// active for this frame — swapping on false->true and restoring on
    /// true->false (§4.5).
    pub fn prompt_for(&mut self, wrong_cmd: bool, normal_prompt: &str, warning_prompt: &str) -> String {
        if wrong_cmd && !self.warning_active {
            self.saved_prompt = Some(normal_prompt.to_string());
            self.warning_active = true;
        } else if !wrong_cmd && self.warning_active {
            self.warning_active = false;
            self.saved_prompt = None;
        }

        if self.warning_active {
            warning_prompt.to_string()
        } else {
            normal_prompt.to_string()
        }
    }

    pub fn is_warning_active(&self) -> bool {
        self.warning_active
    }

    /// Forces the next `diff` call to treat every grapheme as changed — used
    /// after `clear_screen` (Ctrl-L) per §4.2.
    pub fn invalidate(&mut self) {
        self.prev_colors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_diff_reports_every_position() {
        let mut hl = Highlighter::new();
        let colors = vec![Color::Command, Color::Argument];
        let changes = hl.diff(&colors);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn second_identical_diff_reports_nothing() {
        let mut hl = Highlighter::new();
        let colors = vec![Color::Command, Color::Argument];
        hl.diff(&colors);
        let changes = hl.diff(&colors);
        assert!(changes.is_empty());
    }

    #[test]
    fn diff_reports_only_changed_positions() {
        let mut hl = Highlighter::new();
        hl.diff(&[Color::Command, Color::Argument, Color::Argument]);
        let changes = hl.diff(&[Color::Command, Color::String, Color::Argument]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].grapheme_index, 1);
    }

    #[test]
    fn prompt_swaps_on_false_to_true_transition() {
        let mut hl = Highlighter::new();
        assert_eq!(hl.prompt_for(false, "> ", "! > "), "> ");
        assert_eq!(hl.prompt_for(true, "> ", "! > "), "! > ");
        assert!(hl.is_warning_active());
        assert_eq!(hl.prompt_for(false, "> ", "! > "), "> ");
        assert!(!hl.is_warning_active());
    }

    #[test]
    fn invalidate_forces_full_redraw_next_diff() {
        let mut hl = Highlighter::new();
        hl.diff(&[Color::Command]);
        hl.invalidate();
        let changes = hl.diff(&[Color::Command]);
        assert_eq!(changes.len(), 1);
    }
}
