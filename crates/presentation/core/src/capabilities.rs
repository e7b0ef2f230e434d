//! Advertised renderer feature set.
use bitflags::bitflags;

bitflags! {
    /// Features a renderer actually provides.
    ///
    /// Flags are independent. A backend reports its true set once and it stays
    /// fixed for the renderer's lifetime, so callers may query it once and cache
    /// the result.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Coloured output.
        const COLOR    = 0b0000_0001;

        /// Per-pixel shapes for creatures and plants (not glyphs).
        const SPRITES  = 0b0000_0010;

        /// Mouse position and button events.
        const MOUSE    = 0b0000_0100;

        /// Surface follows window/terminal resizes.
        const RESIZING = 0b0000_1000;

        /// Non-ASCII glyphs render correctly.
        const UNICODE  = 0b0001_0000;
    }
}

impl Capabilities {
    pub fn supports_color(&self) -> bool {
        self.contains(Self::COLOR)
    }

    pub fn supports_sprites(&self) -> bool {
        self.contains(Self::SPRITES)
    }

    pub fn supports_mouse(&self) -> bool {
        self.contains(Self::MOUSE)
    }

    pub fn supports_resizing(&self) -> bool {
        self.contains(Self::RESIZING)
    }

    pub fn supports_unicode(&self) -> bool {
        self.contains(Self::UNICODE)
    }
}
