//! World-to-screen window used for culling and coordinate translation.

/// Visible slice of the world.
///
/// `x`/`y` is the world-space origin and may be negative near world edges.
/// `width`/`height` count visible tiles; `screen_x`/`screen_y` is where the
/// first tile is drawn. Clipping against the world bounds belongs to the
/// renderer: a viewport may extend past the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub screen_x: u32,
    pub screen_y: u32,
}

/// Half-open range of world tiles a renderer should visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileSpan {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TileSpan {
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

impl Viewport {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            screen_x: 0,
            screen_y: 0,
        }
    }

    pub const fn with_screen_offset(mut self, screen_x: u32, screen_y: u32) -> Self {
        self.screen_x = screen_x;
        self.screen_y = screen_y;
        self
    }

    /// Viewport of `width` x `height` tiles centred on `(cx, cy)`.
    pub fn centered_on(cx: i32, cy: i32, width: u32, height: u32) -> Self {
        Self::new(cx - (width / 2) as i32, cy - (height / 2) as i32, width, height)
    }

    pub fn contains(&self, wx: i32, wy: i32) -> bool {
        wx >= self.x
            && wy >= self.y
            && i64::from(wx) < i64::from(self.x) + i64::from(self.width)
            && i64::from(wy) < i64::from(self.y) + i64::from(self.height)
    }

    /// Tile offset inside the viewport, including the screen offset.
    pub fn to_screen(&self, wx: i32, wy: i32) -> Option<(u32, u32)> {
        if !self.contains(wx, wy) {
            return None;
        }
        Some((
            self.screen_x + (wx - self.x) as u32,
            self.screen_y + (wy - self.y) as u32,
        ))
    }

    /// Tiles that are both inside the viewport and inside a world of the given size.
    pub fn visible_tiles(&self, world_width: u32, world_height: u32) -> TileSpan {
        let clamp = |v: i64, max: u32| v.clamp(0, i64::from(max)) as i32;
        TileSpan {
            x0: clamp(i64::from(self.x), world_width),
            y0: clamp(i64::from(self.y), world_height),
            x1: clamp(i64::from(self.x) + i64::from(self.width), world_width),
            y1: clamp(i64::from(self.y) + i64::from(self.height), world_height),
        }
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// Moves the origin so `(cx, cy)` lands in the middle.
    pub fn recenter(&mut self, cx: i32, cy: i32) {
        self.x = cx - (self.width / 2) as i32;
        self.y = cy - (self.height / 2) as i32;
    }
}
