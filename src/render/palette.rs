use crate::foundation::core::Rgb8;

pub const BACKGROUND: Rgb8 = Rgb8::from_hex(0x0d1117);
pub const TITLE: Rgb8 = Rgb8::from_hex(0xf0f6fc);
pub const CAPTION: Rgb8 = Rgb8::from_hex(0x7d8590);

/// Discrete intensity level of a single calendar cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorBucket {
    Empty,
    Low,
    MediumLow,
    MediumHigh,
    High,
}

impl ColorBucket {
    pub const ALL: [ColorBucket; 5] = [
        ColorBucket::Empty,
        ColorBucket::Low,
        ColorBucket::MediumLow,
        ColorBucket::MediumHigh,
        ColorBucket::High,
    ];

    pub fn for_count(count: u32) -> Self {
        match count {
            0 => Self::Empty,
            1..=2 => Self::Low,
            3..=5 => Self::MediumLow,
            6..=10 => Self::MediumHigh,
            _ => Self::High,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn color(self) -> Rgb8 {
        match self {
            Self::Empty => Rgb8::from_hex(0x161b22),
            Self::Low => Rgb8::from_hex(0x0e4429),
            Self::MediumLow => Rgb8::from_hex(0x006d32),
            Self::MediumHigh => Rgb8::from_hex(0x26a641),
            Self::High => Rgb8::from_hex(0x39d353),
        }
    }
}
