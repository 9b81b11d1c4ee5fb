use euclid::default::{Box2D, Point2D};

/// Axis a scroll bar moves along.
///
/// The geometry is the same for both axes with x and y swapped, so the bar
/// works in "along" and "across" coordinates and only the helpers here know
/// which is which.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn along(self, point: Point2D<f32>) -> f32 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }

    fn across(self, point: Point2D<f32>) -> f32 {
        match self {
            Self::Horizontal => point.y,
            Self::Vertical => point.x,
        }
    }

    fn rect(self, along: (f32, f32), across: (f32, f32)) -> Box2D<f32> {
        match self {
            Self::Horizontal => Box2D::new(
                Point2D::new(along.0, across.0),
                Point2D::new(along.1, across.1),
            ),
            Self::Vertical => Box2D::new(
                Point2D::new(across.0, along.0),
                Point2D::new(across.1, along.1),
            ),
        }
    }
}

/// Static look-and-feel of a scroll bar.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollBarStyle {
    /// Thickness of the bar, also the length of each edge button.
    pub width: f32,
    pub min_thumb_size: f32,
    /// `None` lets the thumb grow to the whole track.
    pub max_thumb_size: Option<f32>,
    pub use_edge_buttons: bool,
    /// Distance moved by one wheel notch or edge button press. Clicking the
    /// track moves three times as far.
    pub wheel_step: f32,
}

impl Default for ScrollBarStyle {
    fn default() -> Self {
        Self {
            width: 16.0,
            min_thumb_size: 12.0,
            max_thumb_size: None,
            use_edge_buttons: false,
            wheel_step: 30.0,
        }
    }
}

/// Pointer and wheel input routed to a scroll bar by its widget.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollEvent {
    PointerDown(Point2D<f32>),
    PointerMove(Point2D<f32>),
    PointerUp,
    WheelUp,
    WheelDown,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragState {
    pressed_at: f32,
    pos_when_pressed: f32,
}

/// Scroll position and thumb geometry of a scrollable widget.
///
/// The widget pushes the content length ([`Self::set_scroll_range`]) and the
/// visible length ([`Self::set_scroll_space`]) after every layout, routes
/// input through [`Self::handle_event`] and reads [`Self::pos`] when drawing.
/// After any call, `0 <= pos() <= max_pos()` holds.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollBar {
    style: ScrollBarStyle,
    orientation: Orientation,
    /// Start of the bar along the axis, and its anchor edge across it.
    origin: Point2D<f32>,
    length: f32,
    /// Draws the bar before the anchor edge instead of after it.
    aligned_to_end: bool,

    scroll_range: f32,
    scroll_space: f32,
    pos: f32,
    thumb_size: f32,

    drag: Option<DragState>,
    button_minus_hovered: bool,
    button_minus_pressed: bool,
    button_plus_hovered: bool,
    button_plus_pressed: bool,
}

impl ScrollBar {
    pub fn new(orientation: Orientation, style: ScrollBarStyle) -> Self {
        let mut bar = Self {
            style,
            orientation,
            origin: Point2D::origin(),
            length: 0.0,
            aligned_to_end: false,
            scroll_range: 1.0,
            scroll_space: 0.0,
            pos: 0.0,
            thumb_size: 0.0,
            drag: None,
            button_minus_hovered: false,
            button_minus_pressed: false,
            button_plus_hovered: false,
            button_plus_pressed: false,
        };
        bar.setup_thumb_size();
        bar
    }

    pub fn vertical(style: ScrollBarStyle) -> Self {
        Self::new(Orientation::Vertical, style)
    }

    pub fn horizontal(style: ScrollBarStyle) -> Self {
        Self::new(Orientation::Horizontal, style)
    }
}

/// Placement
impl ScrollBar {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn style(&self) -> &ScrollBarStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: ScrollBarStyle) {
        self.style = style;
        self.setup_thumb_size();
        self.update_pos_boundaries();
    }

    pub fn origin(&self) -> Point2D<f32> {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point2D<f32>) {
        self.origin = origin;
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    /// Sets the on-screen length of the bar, edge buttons included.
    pub fn set_length(&mut self, length: f32) {
        self.length = length.max(0.0);
        self.setup_thumb_size();
    }

    pub fn set_aligned_to_end(&mut self, aligned_to_end: bool) {
        self.aligned_to_end = aligned_to_end;
    }
}

/// Scroll position
impl ScrollBar {
    pub fn scroll_range(&self) -> f32 {
        self.scroll_range
    }

    /// Sets the length of the scrolled content; anything below 1 counts as 1.
    pub fn set_scroll_range(&mut self, range: f32) {
        self.scroll_range = range.max(1.0);
        self.setup_thumb_size();
        self.update_pos_boundaries();
    }

    pub fn scroll_space(&self) -> f32 {
        self.scroll_space
    }

    /// Sets the visible length of the content.
    pub fn set_scroll_space(&mut self, space: f32) {
        self.scroll_space = space.max(0.0);
        self.setup_thumb_size();
        self.update_pos_boundaries();
    }

    pub fn pos(&self) -> f32 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: f32) {
        self.pos = pos;
        self.update_pos_boundaries();
    }

    pub fn max_pos(&self) -> f32 {
        (self.scroll_range - self.scroll_space).max(0.0)
    }

    /// Whether there is anything to scroll; hidden bars are neither drawn
    /// nor hit-tested.
    pub fn is_visible(&self) -> bool {
        self.max_pos() != 0.0
    }

    pub fn thumb_size(&self) -> f32 {
        self.thumb_size
    }

    pub fn scroll_plus(&mut self) {
        self.set_pos(self.pos + self.style.wheel_step);
    }

    pub fn scroll_minus(&mut self) {
        self.set_pos(self.pos - self.style.wheel_step);
    }

    pub fn scroll_plus_plenty(&mut self) {
        self.set_pos(self.pos + self.style.wheel_step * 3.0);
    }

    pub fn scroll_minus_plenty(&mut self) {
        self.set_pos(self.pos - self.style.wheel_step * 3.0);
    }

    pub fn scroll_to_end(&mut self) {
        self.set_pos(self.max_pos());
    }

    fn update_pos_boundaries(&mut self) {
        if !(self.pos >= 0.0) || self.scroll_range < self.scroll_space {
            self.pos = 0.0;
        } else if self.pos > self.max_pos() {
            self.pos = self.max_pos();
        }
    }

    fn buttons_length(&self) -> f32 {
        if self.style.use_edge_buttons {
            self.style.width * 2.0
        } else {
            0.0
        }
    }

    /// Sizes the thumb to the visible fraction of the content.
    ///
    /// A minimum larger than the track is ignored, and a maximum below the
    /// minimum means the whole track.
    fn setup_thumb_size(&mut self) {
        let available = (self.length - self.buttons_length()).max(0.0);

        let mut min = self.style.min_thumb_size.max(0.0);
        if min > available {
            min = 0.0;
        }
        let max = match self.style.max_thumb_size {
            Some(max) if max >= min => max,
            _ => available,
        };

        let fraction = (self.scroll_space / self.scroll_range).min(1.0);
        self.thumb_size = (available * fraction).max(min).min(max).min(available);
    }
}

/// Geometry
impl ScrollBar {
    fn along_start(&self) -> f32 {
        self.orientation.along(self.origin)
    }

    fn across_range(&self) -> (f32, f32) {
        let anchor = self.orientation.across(self.origin);
        let from = if self.aligned_to_end {
            anchor - self.style.width
        } else {
            anchor
        };
        (from, from + self.style.width)
    }

    /// The whole bar, edge buttons included.
    pub fn outer_rect(&self) -> Box2D<f32> {
        let start = self.along_start();
        self.orientation
            .rect((start, start + self.length), self.across_range())
    }

    /// The part of the bar the thumb slides in.
    pub fn track_rect(&self) -> Box2D<f32> {
        let start = self.along_start();
        let buttons = self.buttons_length() / 2.0;
        self.orientation.rect(
            (start + buttons, start + self.length - buttons),
            self.across_range(),
        )
    }

    pub fn thumb_rect(&self) -> Box2D<f32> {
        let start = self.along_start();
        let buttons = self.buttons_length() / 2.0;
        let from = start + buttons;
        let to = start + self.length - self.thumb_size - buttons;

        let max_pos = self.max_pos();
        let offset = if max_pos > 0.0 {
            (to - from) * (self.pos / max_pos)
        } else {
            0.0
        };

        self.orientation.rect(
            (from + offset, from + offset + self.thumb_size),
            self.across_range(),
        )
    }

    pub fn button_minus_rect(&self) -> Box2D<f32> {
        let start = self.along_start();
        self.orientation
            .rect((start, start + self.style.width), self.across_range())
    }

    pub fn button_plus_rect(&self) -> Box2D<f32> {
        let end = self.along_start() + self.length;
        self.orientation
            .rect((end - self.style.width, end), self.across_range())
    }

    pub fn hovering_button_minus(&self, pointer: Point2D<f32>) -> bool {
        self.style.use_edge_buttons && contains_inclusive(&self.button_minus_rect(), pointer)
    }

    pub fn hovering_button_plus(&self, pointer: Point2D<f32>) -> bool {
        self.style.use_edge_buttons && contains_inclusive(&self.button_plus_rect(), pointer)
    }
}

/// Input
impl ScrollBar {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn button_minus_hovered(&self) -> bool {
        self.button_minus_hovered
    }

    pub fn button_minus_pressed(&self) -> bool {
        self.button_minus_pressed
    }

    pub fn button_plus_hovered(&self) -> bool {
        self.button_plus_hovered
    }

    pub fn button_plus_pressed(&self) -> bool {
        self.button_plus_pressed
    }

    /// Moves the thumb with the pointer during a drag.
    ///
    /// The position moves by `max_pos()` for every pointer movement of the
    /// free track length, measured from where the drag started.
    pub fn set_pos_from_pointer(&mut self, pointer: Point2D<f32>) {
        let Some(drag) = self.drag else {
            return;
        };

        let track = self.length - self.thumb_size - self.buttons_length();
        if track <= 0.0 {
            return;
        }

        let delta = self.orientation.along(pointer) - drag.pressed_at;
        self.set_pos(drag.pos_when_pressed + self.max_pos() * delta / track);
    }

    /// Applies an input event and reports whether the bar consumed it.
    pub fn handle_event(&mut self, event: ScrollEvent) -> bool {
        match event {
            ScrollEvent::PointerMove(pointer) => {
                self.set_pos_from_pointer(pointer);
                self.update_hover(pointer);
                self.is_dragging()
            }
            ScrollEvent::PointerDown(pointer) => {
                if !self.is_visible() {
                    return false;
                }
                self.update_hover(pointer);

                let thumb = self.thumb_rect();
                if contains_inclusive(&thumb, pointer) {
                    self.drag = Some(DragState {
                        pressed_at: self.orientation.along(pointer),
                        pos_when_pressed: self.pos,
                    });
                } else if self.button_minus_hovered {
                    self.button_minus_pressed = true;
                    self.scroll_minus();
                } else if self.button_plus_hovered {
                    self.button_plus_pressed = true;
                    self.scroll_plus();
                } else if contains_inclusive(&self.outer_rect(), pointer) {
                    if self.orientation.along(pointer) < self.orientation.along(thumb.min) {
                        self.scroll_minus_plenty();
                    } else {
                        self.scroll_plus_plenty();
                    }
                } else {
                    return false;
                }
                true
            }
            ScrollEvent::PointerUp => {
                let handled =
                    self.drag.is_some() || self.button_minus_pressed || self.button_plus_pressed;
                self.drag = None;
                self.button_minus_pressed = false;
                self.button_plus_pressed = false;
                handled
            }
            ScrollEvent::WheelUp | ScrollEvent::WheelDown if !self.is_visible() => false,
            ScrollEvent::WheelUp => {
                self.scroll_minus();
                true
            }
            ScrollEvent::WheelDown => {
                self.scroll_plus();
                true
            }
        }
    }

    fn update_hover(&mut self, pointer: Point2D<f32>) {
        self.button_minus_hovered = self.hovering_button_minus(pointer);
        self.button_plus_hovered = self.hovering_button_plus(pointer);
        if !self.button_minus_hovered {
            self.button_minus_pressed = false;
        }
        if !self.button_plus_hovered {
            self.button_plus_pressed = false;
        }
    }
}

fn contains_inclusive(rect: &Box2D<f32>, point: Point2D<f32>) -> bool {
    point.x >= rect.min.x && point.x <= rect.max.x && point.y >= rect.min.y && point.y <= rect.max.y
}
