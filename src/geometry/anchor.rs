use std::fmt;

/// Position of an anchor along one axis of its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left or top edge.
    Start,
    /// Edge midpoint.
    Middle,
    /// Right or bottom edge.
    End,
}

/// One of the eight resize handles of a bounding box.
///
/// The first letter of the short name is the horizontal position (`L`, `M`,
/// `R`), the second the vertical one (`T`, `M`, `B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKey {
    LeftTop,
    MidTop,
    RightTop,
    LeftMid,
    RightMid,
    LeftBottom,
    MidBottom,
    RightBottom,
}

impl AnchorKey {
    /// All anchors in the order they are generated and indexed.
    pub const ALL: [AnchorKey; 8] = [
        AnchorKey::LeftTop,
        AnchorKey::MidTop,
        AnchorKey::RightTop,
        AnchorKey::LeftMid,
        AnchorKey::RightMid,
        AnchorKey::LeftBottom,
        AnchorKey::MidBottom,
        AnchorKey::RightBottom,
    ];

    pub fn horizontal(self) -> Side {
        match self {
            AnchorKey::LeftTop | AnchorKey::LeftMid | AnchorKey::LeftBottom => Side::Start,
            AnchorKey::MidTop | AnchorKey::MidBottom => Side::Middle,
            AnchorKey::RightTop | AnchorKey::RightMid | AnchorKey::RightBottom => Side::End,
        }
    }

    pub fn vertical(self) -> Side {
        match self {
            AnchorKey::LeftTop | AnchorKey::MidTop | AnchorKey::RightTop => Side::Start,
            AnchorKey::LeftMid | AnchorKey::RightMid => Side::Middle,
            AnchorKey::LeftBottom | AnchorKey::MidBottom | AnchorKey::RightBottom => Side::End,
        }
    }

    /// Two-letter name used by annotation files and cursor mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorKey::LeftTop => "LT",
            AnchorKey::MidTop => "MT",
            AnchorKey::RightTop => "RT",
            AnchorKey::LeftMid => "LM",
            AnchorKey::RightMid => "RM",
            AnchorKey::LeftBottom => "LB",
            AnchorKey::MidBottom => "MB",
            AnchorKey::RightBottom => "RB",
        }
    }
}

impl fmt::Display for AnchorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
