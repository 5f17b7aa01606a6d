use crate::scale::Scale;
use anyhow::{Context, Result};
use std::io::Write;
use xmlwriter::{Indent, Options, XmlWriter};

const PROLOGUE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n",
    "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" ",
    "\"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n",
);

/// Number formatting used when serializing primitives.
pub struct SvgCtx {
    pub precision: usize,
    pub unit: &'static str,
}

impl Default for SvgCtx {
    fn default() -> Self {
        SvgCtx {
            precision: 6,
            unit: "mm",
        }
    }
}

impl SvgCtx {
    /// Fixed-point number without a unit.
    pub fn fmt(&self, v: f64) -> String {
        format!("{:.*}", self.precision, v)
    }

    /// Fixed-point number with the physical unit appended.
    pub fn dim(&self, v: f64) -> String {
        format!("{}{}", self.fmt(v), self.unit)
    }
}

/// A writer that emits every element on a single line with no indentation.
pub fn writer() -> XmlWriter {
    XmlWriter::new(Options {
        indent: Indent::None,
        ..Options::default()
    })
}

fn write_scale(scale: &Scale, w: &mut XmlWriter, ctx: &SvgCtx) {
    for p in scale.primitives() {
        p.write(w, ctx);
    }
    scale.name().write(w, ctx);
}

/// A complete drawing: overall size in millimetres plus its scales.
pub struct Document {
    width: f64,
    height: f64,
    scales: Vec<Scale>,
}

impl Document {
    pub fn new(width: f64, height: f64, scales: Vec<Scale>) -> Self {
        Document {
            width,
            height,
            scales,
        }
    }

    pub fn scales(&self) -> &[Scale] {
        &self.scales
    }

    pub fn to_svg_string(&self, ctx: &SvgCtx) -> String {
        let mut w = writer();
        w.start_element("svg");
        w.write_attribute("width", &ctx.dim(self.width));
        w.write_attribute("height", &ctx.dim(self.height));
        w.write_attribute("version", "1.1");
        w.write_attribute("xmlns", "http://www.w3.org/2000/svg");
        for scale in &self.scales {
            write_scale(scale, &mut w, ctx);
        }
        w.end_element();

        let mut svg = w.end_document();
        svg.insert_str(0, PROLOGUE);
        if !svg.ends_with('\n') {
            svg.push('\n');
        }
        svg
    }

    /// Serializes the document into `sink`. Only a failing sink is an error.
    pub fn render<W: Write>(&self, ctx: &SvgCtx, sink: &mut W) -> Result<()> {
        sink.write_all(self.to_svg_string(ctx).as_bytes())
            .context("failed to write svg")?;
        sink.flush().context("failed to flush svg")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::{build_linear_scale, build_log_scale};

    fn parse_opts() -> roxmltree::ParsingOptions {
        let mut opt = roxmltree::ParsingOptions::default();
        opt.allow_dtd = true;
        opt
    }

    fn sample() -> Document {
        Document::new(
            250.0,
            50.0,
            vec![
                build_log_scale(1, 220.0, 15.0, 10.0, "A"),
                build_linear_scale(1, 220.0, 15.0, 30.0, "L"),
            ],
        )
    }

    #[test]
    fn fixed_point_formatting() {
        let ctx = SvgCtx::default();
        assert_eq!(ctx.fmt(0.1), "0.100000");
        assert_eq!(ctx.dim(250.0), "250.000000mm");
        let coarse = SvgCtx {
            precision: 2,
            unit: "mm",
        };
        assert_eq!(coarse.dim(-1.0 / 3.0), "-0.33mm");
    }

    #[test]
    fn document_is_well_formed_svg() -> Result<()> {
        let svg = sample().to_svg_string(&SvgCtx::default());
        assert!(svg.starts_with("<?xml version=\"1.0\""));
        let doc = roxmltree::Document::parse_with_options(&svg, parse_opts())?;
        let root = doc.root_element();
        assert_eq!(root.tag_name().name(), "svg");
        assert_eq!(root.attribute("width"), Some("250.000000mm"));
        assert_eq!(root.attribute("height"), Some("50.000000mm"));

        let texts: Vec<_> = root
            .children()
            .filter(|n| n.has_tag_name("text"))
            .filter_map(|n| n.text())
            .collect();
        // ten labels and the name of the log scale, then the linear scale name
        assert_eq!(texts.len(), 12);
        assert_eq!(texts[0], "1");
        assert_eq!(texts[10], "A");
        assert_eq!(texts[11], "L");
        Ok(())
    }

    #[test]
    fn every_primitive_is_serialized_in_order() -> Result<()> {
        let document = sample();
        let svg = document.to_svg_string(&SvgCtx::default());
        let doc = roxmltree::Document::parse_with_options(&svg, parse_opts())?;
        let expected: usize = document
            .scales()
            .iter()
            .map(|s| s.primitives().len() + 1)
            .sum();
        let elements: Vec<_> = doc
            .root_element()
            .children()
            .filter(|n| n.is_element())
            .collect();
        assert_eq!(elements.len(), expected);
        assert!(elements[0].has_tag_name("text"));
        assert!(elements[1].has_tag_name("line"));
        Ok(())
    }

    #[test]
    fn rendering_is_idempotent() -> Result<()> {
        let document = sample();
        let ctx = SvgCtx::default();
        let mut first = Vec::new();
        let mut second = Vec::new();
        document.render(&ctx, &mut first)?;
        document.render(&ctx, &mut second)?;
        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first)?, document.to_svg_string(&ctx));
        Ok(())
    }

    #[test]
    fn empty_document_still_has_root() -> Result<()> {
        let svg = Document::new(10.0, 5.0, Vec::new()).to_svg_string(&SvgCtx::default());
        let doc = roxmltree::Document::parse_with_options(&svg, parse_opts())?;
        assert_eq!(doc.root_element().children().count(), 0);
        Ok(())
    }
}
