//! Text component.
//!
//! A [`Text`] holds the full string and how many characters of it are
//! currently visible. The typewriter system grows `visible` over time; the
//! text renderer only draws the visible prefix.

use crate::backend::SpriteHandle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// Full string to display.
    pub content: String,
    /// Number of visible characters (not bytes).
    pub visible: usize,
    /// Bitmap font, created through the graphics backend like any sprite.
    pub font: SpriteHandle,
}

impl Text {
    /// Create a fully visible text.
    pub fn new(content: impl Into<String>, font: SpriteHandle) -> Self {
        let content = content.into();
        let visible = content.chars().count();
        Self {
            content,
            visible,
            font,
        }
    }

    /// Length of the content in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_fully_visible(&self) -> bool {
        self.visible >= self.char_len()
    }

    /// The visible prefix, cut on a character boundary.
    pub fn visible_str(&self) -> &str {
        match self.content.char_indices().nth(self.visible) {
            Some((byte, _)) => &self.content[..byte],
            None => &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_text_is_fully_visible() {
        let text = Text::new("Take this!", SpriteHandle(3));
        assert_eq!(text.visible, 10);
        assert!(text.is_fully_visible());
        assert_eq!(text.visible_str(), "Take this!");
    }

    #[test]
    fn visible_prefix_respects_char_boundaries() {
        let mut text = Text::new("¡Peligro!", SpriteHandle(0));
        text.visible = 2;
        assert_eq!(text.visible_str(), "¡P");
        text.visible = 0;
        assert_eq!(text.visible_str(), "");
        assert!(!text.is_fully_visible());
    }
}
