use crate::scale::{build_linear_scale, build_log_scale, Scale};
use anyhow::{bail, Result};
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map},
    multi::separated_list0,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

/// Largest accepted decade count; the scale base is `10^decades`.
const MAX_DECADES: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleKind {
    Log,
    Linear,
}

/// Where and how one scale is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSpec {
    pub kind: ScaleKind,
    pub name: String,
    pub decades: u32,
    pub length: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

impl ScaleSpec {
    pub fn log(name: &str, decades: u32, length: f64, x_offset: f64, y_offset: f64) -> Self {
        ScaleSpec {
            kind: ScaleKind::Log,
            name: name.to_string(),
            decades,
            length,
            x_offset,
            y_offset,
        }
    }

    pub fn build(&self) -> Scale {
        let build = match self.kind {
            ScaleKind::Log => build_log_scale,
            ScaleKind::Linear => build_linear_scale,
        };
        build(
            self.decades,
            self.length,
            self.x_offset,
            self.y_offset,
            &self.name,
        )
    }
}

/// The classic three-scale arrangement: A and B running forwards, C reversed.
pub fn default_slide_rule(width: f64, height: f64) -> Vec<ScaleSpec> {
    let l = width - 30.0;
    vec![
        ScaleSpec::log("A", 1, l, 15.0, height / 6.0),
        ScaleSpec::log("B", 2, l, 15.0, height / 3.0),
        ScaleSpec::log("C", 1, -l, l + 15.0, 2.0 * height / 3.0),
    ]
}

struct RawSpec<'a> {
    kind: &'a str,
    name: &'a str,
    params: Vec<f64>,
}

fn sep(input: &str) -> IResult<&str, ()> {
    let comma = map(tuple((space0, char(','), space0)), |_| ());
    let spaces = map(space1, |_| ());
    alt((comma, spaces))(input)
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && c != ',' && c != '(' && c != ')'
}

fn spec_call(input: &str) -> IResult<&str, RawSpec<'_>> {
    let (input, kind) = take_while1(|c: char| c.is_ascii_alphabetic())(input)?;
    let (input, (name, params)) = delimited(
        tuple((space0, char('('), space0)),
        tuple((
            take_while1(is_name_char),
            preceded(sep, separated_list0(sep, double)),
        )),
        tuple((space0, char(')'))),
    )(input)?;
    Ok((input, RawSpec { kind, name, params }))
}

/// Parses a scale given as `kind(name, decades, length, x, y)`.
///
/// `kind` is `log` or `lin`; parameters are separated by commas or spaces.
/// This is also where the numeric preconditions of the scale builders are
/// enforced, since the builders themselves do not check them.
pub fn parse_scale_spec(input: &str) -> Result<ScaleSpec> {
    let raw = match all_consuming(terminated(preceded(space0, spec_call), space0))(input) {
        Ok((_, raw)) => raw,
        Err(_) => bail!("invalid scale spec: {}", input),
    };

    let kind = match raw.kind {
        "log" => ScaleKind::Log,
        "lin" | "linear" => ScaleKind::Linear,
        other => bail!("unsupported scale kind: {}", other),
    };
    let &[decades, length, x_offset, y_offset] = raw.params.as_slice() else {
        bail!(
            "{}() requires a name and 4 numbers, got {} numbers",
            raw.kind,
            raw.params.len()
        );
    };
    if decades.fract() != 0.0 || decades < 1.0 || decades > MAX_DECADES as f64 {
        bail!(
            "decades must be a whole number between 1 and {}, got {}",
            MAX_DECADES,
            decades
        );
    }
    if length == 0.0 || !length.is_finite() {
        bail!("scale length must be finite and non-zero, got {}", length);
    }
    if !x_offset.is_finite() || !y_offset.is_finite() {
        bail!("scale position must be finite: {},{}", x_offset, y_offset);
    }

    Ok(ScaleSpec {
        kind,
        name: raw.name.to_string(),
        decades: decades as u32,
        length,
        x_offset,
        y_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_spec() -> Result<()> {
        let spec = parse_scale_spec("log(A, 1, 220, 15, 8.5)")?;
        assert_eq!(spec, ScaleSpec::log("A", 1, 220.0, 15.0, 8.5));
        Ok(())
    }

    #[test]
    fn parse_spaces_and_negative_length() -> Result<()> {
        let spec = parse_scale_spec("  log ( CI 2 -220 235 33.3 ) ")?;
        assert_eq!(spec.name, "CI");
        assert_eq!(spec.decades, 2);
        assert_eq!(spec.length, -220.0);
        assert_eq!(spec.x_offset, 235.0);
        Ok(())
    }

    #[test]
    fn parse_linear_spec() -> Result<()> {
        let spec = parse_scale_spec("lin(L,1,200,15,40)")?;
        assert_eq!(spec.kind, ScaleKind::Linear);
        assert!(spec.build().primitives().is_empty());
        Ok(())
    }

    #[test]
    fn rejects_bad_specs() {
        let cases = [
            ("log(A, 1, 220, 15)", "requires a name and 4 numbers"),
            ("sqrt(A, 1, 220, 15, 8)", "unsupported scale kind"),
            ("log(A, 1.5, 220, 15, 8)", "decades must be a whole number"),
            ("log(A, 0, 220, 15, 8)", "decades must be a whole number"),
            ("log(A, 1, 0, 15, 8)", "scale length must be finite"),
            ("log(A, 1, 220, 15, 8) extra", "invalid scale spec"),
            ("log(A)", "invalid scale spec"),
            ("log A, 1, 220, 15, 8", "invalid scale spec"),
        ];
        for (input, msg) in cases {
            let err = parse_scale_spec(input).unwrap_err();
            assert!(
                err.to_string().contains(msg),
                "{input}: unexpected error {err}"
            );
        }
    }

    #[test]
    fn default_slide_rule_layout() {
        let specs = default_slide_rule(250.0, 60.0);
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(specs[1].decades, 2);
        assert_eq!(specs[0].length, 220.0);
        assert_eq!(specs[2].length, -220.0);
        assert_eq!(specs[2].x_offset, 235.0);
        assert_eq!(specs[2].y_offset, 40.0);

        // the reversed C scale puts its name where A puts its own
        let a = specs[0].build();
        let c = specs[2].build();
        assert_eq!(a.name().x, c.name().x);
    }
}
