use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Tesseract page segmentation modes (`--psm`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PageSegMode {
    /// Orientation and script detection only.
    OsdOnly = 0,
    /// Automatic segmentation with orientation and script detection.
    AutoOsd = 1,
    /// Automatic segmentation, no OSD or OCR.
    AutoOnly = 2,
    #[default]
    Auto = 3,
    SingleColumn = 4,
    SingleBlockVerticalText = 5,
    SingleBlock = 6,
    SingleLine = 7,
    SingleWord = 8,
    CircleWord = 9,
    SingleChar = 10,
    SparseText = 11,
    SparseTextOsd = 12,
    /// Single text line, bypassing Tesseract-specific hacks.
    RawLine = 13,
}

impl PageSegMode {
    pub const ALL: [PageSegMode; 14] = [
        PageSegMode::OsdOnly,
        PageSegMode::AutoOsd,
        PageSegMode::AutoOnly,
        PageSegMode::Auto,
        PageSegMode::SingleColumn,
        PageSegMode::SingleBlockVerticalText,
        PageSegMode::SingleBlock,
        PageSegMode::SingleLine,
        PageSegMode::SingleWord,
        PageSegMode::CircleWord,
        PageSegMode::SingleChar,
        PageSegMode::SparseText,
        PageSegMode::SparseTextOsd,
        PageSegMode::RawLine,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the mode needs the `osd` data file installed.
    pub fn needs_osd(self) -> bool {
        matches!(
            self,
            PageSegMode::OsdOnly | PageSegMode::AutoOsd | PageSegMode::SparseTextOsd
        )
    }

    /// Out-of-range values map to [`PageSegMode::Auto`].
    pub fn from_u8_or_default(value: u8) -> Self {
        Self::try_from(value).unwrap_or_default()
    }
}

impl TryFrom<u8> for PageSegMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("page segmentation mode must be 0-13, got {value}"))
    }
}

impl FromStr for PageSegMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid page segmentation mode '{s}': {e}"))?;
        Self::try_from(value)
    }
}

impl fmt::Display for PageSegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}
