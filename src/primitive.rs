use crate::svg::SvgCtx;
use xmlwriter::XmlWriter;

/// Stroke width of every tick line, in drawing units (no unit suffix).
pub const STROKE_WIDTH: f64 = 0.1;

/// A text element whose anchor is already shifted so the text appears
/// centered on the logical position it was created for.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Font size the anchor was centered for; not written to the output.
    #[allow(dead_code)]
    pub size: f64,
}

/// Builds a [`Label`] centered on `(x, y)`.
///
/// The horizontal shift is derived from the text length (one sixth of the
/// font size per character), the vertical shift is half the font size.
pub fn make_label(text: impl Into<String>, x: f64, y: f64, size: f64) -> Label {
    let text = text.into();
    let x_scale = text.chars().count() as f64 / 6.0;
    Label {
        x: x - x_scale * size,
        y: y - size / 2.0,
        size,
        text,
    }
}

impl Label {
    pub fn write(&self, w: &mut XmlWriter, ctx: &SvgCtx) {
        w.start_element("text");
        w.write_attribute("x", &ctx.dim(self.x));
        w.write_attribute("y", &ctx.dim(self.y));
        w.write_text(&self.text);
        w.end_element();
    }
}

/// A vertical line of length `len` hanging down from `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub x: f64,
    pub y: f64,
    pub len: f64,
}

impl Tick {
    pub fn write(&self, w: &mut XmlWriter, ctx: &SvgCtx) {
        w.start_element("line");
        w.write_attribute("x1", &ctx.dim(self.x));
        w.write_attribute("y1", &ctx.dim(self.y));
        w.write_attribute("x2", &ctx.dim(self.x));
        w.write_attribute("y2", &ctx.dim(self.y + self.len));
        w.write_attribute(
            "style",
            &format!("stroke:rgb(0,0,0);stroke-width:{}", ctx.fmt(STROKE_WIDTH)),
        );
        w.end_element();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Label(Label),
    Tick(Tick),
}

impl Primitive {
    pub fn write(&self, w: &mut XmlWriter, ctx: &SvgCtx) {
        match self {
            Primitive::Label(label) => label.write(w, ctx),
            Primitive::Tick(tick) => tick.write(w, ctx),
        }
    }
}

impl From<Label> for Primitive {
    fn from(label: Label) -> Self {
        Primitive::Label(label)
    }
}

impl From<Tick> for Primitive {
    fn from(tick: Tick) -> Self {
        Primitive::Tick(tick)
    }
}
