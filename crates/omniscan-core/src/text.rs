/// A positioned fragment of decoded text from one `BT`..`ET` block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRun {
    /// Font resource name active when the run was shown (e.g. `"F1"`).
    pub font: String,
    /// Font size in text space units.
    pub font_size: f64,
    /// X of the first shown string, in PDF user space.
    pub x: f64,
    /// Y of the first shown string, in PDF user space (origin bottom-left).
    pub y: f64,
    /// Decoded text. Contains `'\n'` where the block moved to a new line.
    pub text: String,
}

impl TextRun {
    /// Create a run at `(x, y)`.
    pub fn new(
        font: impl Into<String>,
        font_size: f64,
        x: f64,
        y: f64,
        text: impl Into<String>,
    ) -> Self {
        Self {
            font: font.into(),
            font_size,
            x,
            y,
            text: text.into(),
        }
    }
}
