use serde::{Deserialize, Serialize};

/// Tolerance used when comparing frames that went through float arithmetic.
pub const EPSILON: f64 = 1e-6;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn cross(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    pub fn along(self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self { Self::new(self.x + dx, self.y + dy) }

    /// Builds a point from its coordinate along `axis` and across it.
    pub fn from_axes(axis: Orientation, along: f64, cross: f64) -> Self {
        match axis {
            Orientation::Horizontal => Self::new(along, cross),
            Orientation::Vertical => Self::new(cross, along),
        }
    }
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self { Self { width, height } }

    pub fn along(self, axis: Orientation) -> f64 {
        match axis {
            Orientation::Horizontal => self.width,
            Orientation::Vertical => self.height,
        }
    }
}

impl Rect {
    pub const ZERO: Rect = Rect { origin: Point::ZERO, size: Size::ZERO };

    pub const fn new(origin: Point, size: Size) -> Self { Self { origin, size } }

    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// Builds a rect from a `(start, length)` span along `axis` and one across it.
    pub fn from_spans(axis: Orientation, along: (f64, f64), cross: (f64, f64)) -> Self {
        Self::new(
            Point::from_axes(axis, along.0, cross.0),
            match axis {
                Orientation::Horizontal => Size::new(along.1, cross.1),
                Orientation::Vertical => Size::new(cross.1, along.1),
            },
        )
    }

    pub fn min(&self) -> Point { self.origin }

    pub fn max(&self) -> Point {
        Point::new(self.origin.x + self.size.width, self.origin.y + self.size.height)
    }

    pub fn mid(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn min_x(&self) -> f64 { self.origin.x }

    pub fn min_y(&self) -> f64 { self.origin.y }

    pub fn max_x(&self) -> f64 { self.origin.x + self.size.width }

    pub fn max_y(&self) -> f64 { self.origin.y + self.size.height }

    /// `(start, length)` of the rect along `axis`.
    pub fn span(&self, axis: Orientation) -> (f64, f64) {
        (self.origin.along(axis), self.size.along(axis))
    }

    /// Half-open containment, so adjacent rects never both claim a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x() - EPSILON
            && other.min_y() >= self.min_y() - EPSILON
            && other.max_x() <= self.max_x() + EPSILON
            && other.max_y() <= self.max_y() + EPSILON
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.origin.offset(dx, dy), self.size)
    }

    pub fn inset(&self, dx: f64, dy: f64) -> Rect {
        Rect::from_xywh(
            self.origin.x + dx,
            self.origin.y + dy,
            (self.size.width - 2.0 * dx).max(0.0),
            (self.size.height - 2.0 * dy).max(0.0),
        )
    }

    pub fn approx_eq(&self, other: &Rect) -> bool {
        (self.origin.x - other.origin.x).abs() < EPSILON
            && (self.origin.y - other.origin.y).abs() < EPSILON
            && (self.size.width - other.size.width).abs() < EPSILON
            && (self.size.height - other.size.height).abs() < EPSILON
    }
}
