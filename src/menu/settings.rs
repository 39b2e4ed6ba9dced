/// Static behaviour flags of a menu, authored once per template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuSettings {
    /// The menu wants the whole screen and cannot be shown next to another
    /// fullscreen menu.
    pub fullscreen: bool,
    /// A new fullscreen menu may close this one to make room for itself.
    pub can_be_closed: bool,
    /// When blocked by another fullscreen menu, wait in the deferral queue
    /// instead of being dropped.
    pub should_be_queued: bool,
    /// Keep hidden instances around for reuse instead of destroying them.
    pub should_be_pooled: bool,
    /// The outside-click catcher swallows pointer input while this menu is
    /// its target.
    pub blocks_outside_input: bool,
    /// Stack above every menu that does not have this flag.
    pub always_on_top: bool,
    /// Maximum number of idle instances kept for this menu. `None` falls back
    /// to the controller's default.
    pub pool_capacity: Option<usize>,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuSettings {
    pub const fn new() -> Self {
        Self {
            fullscreen: false,
            can_be_closed: true,
            should_be_queued: false,
            should_be_pooled: true,
            blocks_outside_input: true,
            always_on_top: false,
            pool_capacity: None,
        }
    }

    pub const fn fullscreen(mut self) -> Self {
        self.fullscreen = true;
        self
    }

    pub const fn not_closable(mut self) -> Self {
        self.can_be_closed = false;
        self
    }

    pub const fn queued(mut self) -> Self {
        self.should_be_queued = true;
        self
    }

    pub const fn not_pooled(mut self) -> Self {
        self.should_be_pooled = false;
        self
    }

    pub const fn passthrough_outside(mut self) -> Self {
        self.blocks_outside_input = false;
        self
    }

    pub const fn always_on_top(mut self) -> Self {
        self.always_on_top = true;
        self
    }

    pub const fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = Some(capacity);
        self
    }

    /// A menu that refuses to be closed while it owns the whole screen keeps
    /// every other fullscreen menu out.
    pub const fn should_block_new_menu(&self) -> bool {
        !self.can_be_closed && self.fullscreen
    }
}
