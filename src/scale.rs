use crate::primitive::{make_label, Label, Primitive, Tick};
use tracing::{debug, trace};

/// Smallest physical gap, in drawing units, at which two ticks stay distinguishable.
pub const MIN_SEPARATION: f64 = 1.0;
pub const LABEL_SIZE: f64 = 8.0;
pub const MAJOR_TICK_LEN: f64 = 4.0;

const FINE_TICK_LEN: f64 = 1.0;
const TENTH_TICK_LEN: f64 = 2.0;
const HALF_TICK_LEN: f64 = 3.0;

/// Physical distance from the start of a scale to `value`.
///
/// `base` is the full span of the scale (10 for one decade, 100 for two) and
/// `length` the physical length assigned to it. A negative `length` mirrors
/// the scale. `value` must be positive and `base` greater than one; other
/// inputs produce NaN or infinities and are not checked here.
pub fn offset(value: f64, base: f64, length: f64) -> f64 {
    length * (value.ln() / base.ln())
}

/// An unlabeled gradation relative to the start of its scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubTick {
    pub offset: f64,
    pub len: f64,
}

fn separated(a: f64, b: f64) -> bool {
    (a - b).abs() >= MIN_SEPARATION
}

/// Plans the minor ticks of the major interval `[start, start + step]`.
///
/// Three densities are checked independently against [`MIN_SEPARATION`]:
/// odd twentieths, tenths (without the fifth, which is the half mark) and the
/// half mark itself. Every density that fits is emitted, finest first.
pub fn plan_subticks(start: f64, step: f64, base: f64, length: f64) -> Vec<SubTick> {
    let end = start + step;
    let halfway = start + 0.5 * step;
    let end_pos = offset(end, base, length);
    let tenth = 0.1 * step;
    let mut rv = Vec::new();

    let fine = separated(end_pos, offset(end - 0.05 * step, base, length));
    if fine {
        rv.extend((0..10).map(|n| SubTick {
            offset: offset(start + (n as f64 + 0.5) * tenth, base, length),
            len: FINE_TICK_LEN,
        }));
    }

    let tenths = separated(end_pos, offset(end - tenth, base, length));
    if tenths {
        rv.extend((1..10).filter(|&n| n != 5).map(|n| SubTick {
            offset: offset(start + n as f64 * tenth, base, length),
            len: TENTH_TICK_LEN,
        }));
    }

    let half_pos = offset(halfway, base, length);
    let half = separated(end_pos, half_pos);
    if half {
        rv.push(SubTick {
            offset: half_pos,
            len: HALF_TICK_LEN,
        });
    }

    trace!(start, step, fine, tenths, half, "planned subticks");
    rv
}

/// A named set of positioned primitives, built once and never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    name: Label,
    elems: Vec<Primitive>,
}

impl Scale {
    pub fn name(&self) -> &Label {
        &self.name
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.elems
    }
}

fn name_label(name: &str, length: f64, x_offset: f64, y_offset: f64) -> Label {
    // Reversed scales carry their name at the far end so it stays readable.
    let x = if length < 0.0 {
        (length + x_offset) - 10.0
    } else {
        x_offset - 10.0
    };
    make_label(name, x, y_offset + 4.0, LABEL_SIZE)
}

/// Builds a logarithmic scale spanning `decades` powers of ten.
///
/// Every leading digit of every decade gets a label and a major tick; the
/// intervals between them are filled by [`plan_subticks`].
pub fn build_log_scale(
    decades: u32,
    length: f64,
    x_offset: f64,
    y_offset: f64,
    name: &str,
) -> Scale {
    let base = 10f64.powi(decades as i32);
    let mut elems: Vec<Primitive> = Vec::new();

    for i in 1..=10u32 {
        for j in 0..decades {
            let multiplier = 10f64.powi(j as i32);
            let value = f64::from(i) * multiplier;
            let pos = x_offset + offset(value, base, length);
            elems.push(make_label(value.to_string(), pos, y_offset + 2.0, LABEL_SIZE).into());
            elems.push(
                Tick {
                    x: pos,
                    y: y_offset,
                    len: MAJOR_TICK_LEN,
                }
                .into(),
            );
            if i < 10 {
                for sub in plan_subticks(value, multiplier, base, length) {
                    elems.push(
                        Tick {
                            x: x_offset + sub.offset,
                            y: y_offset,
                            len: sub.len,
                        }
                        .into(),
                    );
                }
            }
        }
    }

    debug!(name, decades, length, elems = elems.len(), "built log scale");
    Scale {
        name: name_label(name, length, x_offset, y_offset),
        elems,
    }
}

/// Builds a linear scale.
///
/// Only the name label is produced so far; linear graduations are not
/// implemented and the tick set is always empty.
pub fn build_linear_scale(
    decades: u32,
    length: f64,
    x_offset: f64,
    y_offset: f64,
    name: &str,
) -> Scale {
    debug!(name, decades, length, "linear scale has no graduations yet");
    Scale {
        name: name_label(name, length, x_offset, y_offset),
        elems: Vec::new(),
    }
}
