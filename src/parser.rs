use crate::ir::{BoundingBox, Point, Shape, ShapeKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::f64::consts::TAU;
use std::ops::Range;
use tracing::{debug, warn};

// Interior samples per curve segment when flattening path outlines.
const CURVE_SAMPLES: usize = 18;

static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*/>|<style\b[^>]*>.*?</style\s*>").unwrap());
static ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<(polygon|polyline|path)\b((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#).unwrap()
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static PATH_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([MmLlHhVvCcSsQqTtAaZz])|([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)|([\s,]+)|(.)")
        .unwrap()
});

/// A region element found in the map document.
#[derive(Debug, Clone)]
pub struct SvgRegion {
    pub id: String,
    pub shape: Shape,
    /// Byte range of the opening tag in `ParsedMap::source`.
    pub open_tag: Range<usize>,
    /// Byte offset just past the element (its closing tag, or the opening tag
    /// when self-closing).
    pub element_end: usize,
}

#[derive(Debug, Clone)]
pub struct ParsedMap {
    /// The document with `<style>` blocks removed; region offsets point into it.
    pub source: String,
    pub regions: Vec<SvgRegion>,
    /// Region elements dropped because they carry no `id`.
    pub skipped: usize,
}

pub fn parse_svg_regions(svg: &str) -> ParsedMap {
    let source = STYLE_RE.replace_all(svg, "").into_owned();
    let mut regions = Vec::new();
    let mut skipped = 0;

    for caps in ELEMENT_RE.captures_iter(&source) {
        let (Some(whole), Some(tag), Some(attr_text)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(kind) = ShapeKind::from_tag(tag.as_str()) else {
            continue;
        };
        let attrs = parse_attributes(attr_text.as_str());
        let Some(id) = attr_value(&attrs, "id").filter(|id| !id.is_empty()) else {
            skipped += 1;
            continue;
        };
        let self_closing = caps.get(3).is_some_and(|m| !m.as_str().is_empty());
        let element_end = if self_closing {
            whole.end()
        } else {
            closing_tag_end(&source, whole.end(), kind.tag()).unwrap_or(whole.end())
        };

        let shape = match kind {
            ShapeKind::Polygon | ShapeKind::Polyline => {
                shape_from_points(kind, attr_value(&attrs, "points").unwrap_or(""))
            }
            ShapeKind::Path => shape_from_path(attr_value(&attrs, "d").unwrap_or("")),
        };
        debug!(region = %id, kind = kind.tag(), points = shape.points().len(), "parsed region");

        regions.push(SvgRegion {
            id: unescape_xml(id),
            shape,
            open_tag: whole.range(),
            element_end,
        });
    }

    ParsedMap {
        source,
        regions,
        skipped,
    }
}

pub(crate) fn parse_attributes(text: &str) -> Vec<(&str, &str)> {
    ATTR_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((name, value))
        })
        .collect()
}

fn attr_value<'a>(attrs: &[(&'a str, &'a str)], name: &str) -> Option<&'a str> {
    attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
}

fn closing_tag_end(source: &str, from: usize, tag: &str) -> Option<usize> {
    let rest = source.get(from..)?;
    let start = rest.find(&format!("</{tag}"))?;
    let close = rest[start..].find('>')?;
    Some(from + start + close + 1)
}

/// Result of reading a coordinate attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateList {
    pub points: Vec<Point>,
    /// Some tokens could not be read; `points` then holds only what was
    /// salvageable and is good for a bounding box at most.
    pub malformed: bool,
}

/// Reads an SVG `points` list: numbers separated by whitespace and/or
/// commas, taken in x,y pairs.
pub fn parse_points(attr: &str) -> CoordinateList {
    let numbers: Vec<Option<f32>> = attr
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f32>().ok().filter(|v| v.is_finite()))
        .collect();

    if numbers.len() % 2 == 0 && numbers.iter().all(Option::is_some) {
        let points = numbers
            .chunks_exact(2)
            .filter_map(|pair| Some(Point::new(pair[0]?, pair[1]?)))
            .collect();
        return CoordinateList {
            points,
            malformed: false,
        };
    }

    // Keep well-formed `x,y` tokens for the bounding box.
    let points = attr
        .split_whitespace()
        .filter_map(|token| {
            let (x, y) = token.split_once(',')?;
            let x = x.parse::<f32>().ok().filter(|v| v.is_finite())?;
            let y = y.parse::<f32>().ok().filter(|v| v.is_finite())?;
            Some(Point::new(x, y))
        })
        .collect();
    CoordinateList {
        points,
        malformed: true,
    }
}

fn shape_from_points(kind: ShapeKind, attr: &str) -> Shape {
    let list = parse_points(attr);
    if list.malformed {
        warn!(kind = kind.tag(), "unreadable points attribute, falling back to bounding box");
        return Shape::malformed(kind, BoundingBox::from_points(&list.points));
    }
    Shape::new(kind, list.points)
}

/// Flattened path outline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathOutline {
    pub points: Vec<Point>,
    /// Any curve or arc segment was sampled.
    pub curved: bool,
    pub subpaths: usize,
    pub malformed: bool,
}

impl PathOutline {
    /// A single straight-edged subpath can be treated as a polygon.
    pub fn is_polygonal(&self) -> bool {
        !self.malformed && !self.curved && self.subpaths == 1
    }
}

fn shape_from_path(d: &str) -> Shape {
    let outline = parse_path_data(d);
    // A partial outline would give a truncated box, so nothing is kept.
    if outline.malformed {
        warn!("unreadable path data, region left without a label");
        return Shape::malformed(ShapeKind::Path, None);
    }
    if outline.is_polygonal() {
        Shape::new(ShapeKind::Path, outline.points)
    } else {
        Shape::approximate(ShapeKind::Path, outline.points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PathToken<'a> {
    Command(char),
    /// Raw number text; arc flags may be packed into it (`0150`).
    Number(&'a str),
}

fn tokenize_path(d: &str) -> Option<Vec<PathToken<'_>>> {
    let mut tokens = Vec::new();
    for caps in PATH_TOKEN_RE.captures_iter(d) {
        if let Some(cmd) = caps.get(1) {
            tokens.push(PathToken::Command(cmd.as_str().chars().next()?));
        } else if let Some(num) = caps.get(2) {
            tokens.push(PathToken::Number(num.as_str()));
        } else if caps.get(4).is_some() {
            return None;
        }
    }
    Some(tokens)
}

struct PathCursor<'a> {
    tokens: Vec<PathToken<'a>>,
    pos: usize,
    // Unread rest of a number token whose leading arc flag was taken.
    tail: Option<&'a str>,
}

impl<'a> PathCursor<'a> {
    fn new(tokens: Vec<PathToken<'a>>) -> Self {
        Self {
            tokens,
            pos: 0,
            tail: None,
        }
    }

    fn is_done(&self) -> bool {
        self.tail.is_none() && self.pos >= self.tokens.len()
    }

    fn next_command(&mut self) -> Option<char> {
        if self.tail.is_some() {
            return None;
        }
        match self.tokens.get(self.pos)? {
            PathToken::Command(c) => {
                self.pos += 1;
                Some(*c)
            }
            PathToken::Number(_) => None,
        }
    }

    fn number_text(&mut self) -> Option<&'a str> {
        if let Some(tail) = self.tail.take() {
            return Some(tail);
        }
        match self.tokens.get(self.pos)? {
            PathToken::Number(text) => {
                self.pos += 1;
                Some(*text)
            }
            PathToken::Command(_) => None,
        }
    }

    fn number(&mut self) -> Option<f64> {
        self.number_text()?.parse().ok().filter(|v: &f64| v.is_finite())
    }

    /// Arc flags are a single `0` or `1` and need no separator after them.
    fn flag(&mut self) -> Option<f64> {
        let text = self.number_text()?;
        let value = match text.as_bytes().first().copied()? {
            b'0' => 0.0,
            b'1' => 1.0,
            _ => return None,
        };
        let rest = &text[1..];
        if !rest.is_empty() {
            self.tail = Some(rest);
        }
        Some(value)
    }
}

fn command_arity(cmd: char) -> usize {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' | 'T' => 2,
        'H' | 'V' => 1,
        'S' | 'Q' => 4,
        'C' => 6,
        'A' => 7,
        _ => 0,
    }
}

/// Parses path data (`M L H V C S Q T A Z`, absolute and relative) into a
/// point outline. Curves and arcs are sampled.
pub fn parse_path_data(d: &str) -> PathOutline {
    let mut outline = PathOutline::default();
    let Some(tokens) = tokenize_path(d) else {
        outline.malformed = true;
        return outline;
    };

    let mut cursor = PathCursor::new(tokens);
    let mut pen = PathPen::default();
    let mut cmd: Option<char> = None;
    while !cursor.is_done() {
        if let Some(c) = cursor.next_command() {
            cmd = Some(c);
            if c.eq_ignore_ascii_case(&'z') {
                pen.close();
                continue;
            }
        }
        let Some(c) = cmd.filter(|c| !c.eq_ignore_ascii_case(&'z')) else {
            outline.malformed = true;
            break;
        };

        let arity = command_arity(c);
        let is_arc = c.eq_ignore_ascii_case(&'a');
        let mut args = [0.0_f64; 7];
        for (slot, arg) in args.iter_mut().take(arity).enumerate() {
            let value = if is_arc && (slot == 3 || slot == 4) {
                cursor.flag()
            } else {
                cursor.number()
            };
            match value {
                Some(v) => *arg = v,
                None => {
                    outline.malformed = true;
                    break;
                }
            }
        }
        if outline.malformed {
            break;
        }

        pen.segment(c, &args[..arity], &mut outline);
        // Extra coordinate pairs after a moveto are implicit linetos.
        if c == 'M' {
            cmd = Some('L');
        } else if c == 'm' {
            cmd = Some('l');
        }
    }

    outline.points = pen.points;
    outline
}

#[derive(Debug, Default)]
struct PathPen {
    points: Vec<Point>,
    current: (f64, f64),
    start: (f64, f64),
    last_cubic_ctrl: Option<(f64, f64)>,
    last_quad_ctrl: Option<(f64, f64)>,
}

impl PathPen {
    fn push(&mut self, p: (f64, f64)) {
        self.points.push(Point::new(p.0 as f32, p.1 as f32));
    }

    fn close(&mut self) {
        self.current = self.start;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }

    fn segment(&mut self, cmd: char, args: &[f64], outline: &mut PathOutline) {
        let rel = cmd.is_ascii_lowercase();
        let (cx, cy) = self.current;
        let abs = |x: f64, y: f64| if rel { (cx + x, cy + y) } else { (x, y) };
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            'M' => {
                let p = abs(args[0], args[1]);
                outline.subpaths += 1;
                self.start = p;
                self.current = p;
                self.push(p);
            }
            'L' => {
                let p = abs(args[0], args[1]);
                self.current = p;
                self.push(p);
            }
            'H' => {
                let x = if rel { cx + args[0] } else { args[0] };
                self.current = (x, cy);
                self.push(self.current);
            }
            'V' => {
                let y = if rel { cy + args[0] } else { args[0] };
                self.current = (cx, y);
                self.push(self.current);
            }
            'C' | 'S' => {
                let (c1, c2, end) = if cmd.eq_ignore_ascii_case(&'c') {
                    (abs(args[0], args[1]), abs(args[2], args[3]), abs(args[4], args[5]))
                } else {
                    let c1 = reflect(self.last_cubic_ctrl, self.current);
                    (c1, abs(args[0], args[1]), abs(args[2], args[3]))
                };
                let p0 = self.current;
                for t in sample_ts() {
                    self.push(cubic_at(p0, c1, c2, end, t));
                }
                self.push(end);
                self.current = end;
                cubic_ctrl = Some(c2);
                outline.curved = true;
            }
            'Q' | 'T' => {
                let (ctrl, end) = if cmd.eq_ignore_ascii_case(&'q') {
                    (abs(args[0], args[1]), abs(args[2], args[3]))
                } else {
                    (reflect(self.last_quad_ctrl, self.current), abs(args[0], args[1]))
                };
                let p0 = self.current;
                for t in sample_ts() {
                    self.push(quad_at(p0, ctrl, end, t));
                }
                self.push(end);
                self.current = end;
                quad_ctrl = Some(ctrl);
                outline.curved = true;
            }
            'A' => {
                let end = abs(args[5], args[6]);
                let arc = ArcSegment {
                    from: self.current,
                    to: end,
                    rx: args[0],
                    ry: args[1],
                    rotation: args[2],
                    large_arc: args[3] != 0.0,
                    sweep: args[4] != 0.0,
                };
                for p in arc.samples() {
                    self.push(p);
                }
                self.push(end);
                self.current = end;
                outline.curved = true;
            }
            _ => {}
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
    }
}

fn sample_ts() -> impl Iterator<Item = f64> {
    (1..=CURVE_SAMPLES).map(|k| k as f64 / (CURVE_SAMPLES + 1) as f64)
}

fn reflect(ctrl: Option<(f64, f64)>, about: (f64, f64)) -> (f64, f64) {
    match ctrl {
        Some((x, y)) => (2.0 * about.0 - x, 2.0 * about.1 - y),
        None => about,
    }
}

fn cubic_at(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

fn quad_at(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    (
        mt * mt * p0.0 + 2.0 * mt * t * p1.0 + t * t * p2.0,
        mt * mt * p0.1 + 2.0 * mt * t * p1.1 + t * t * p2.1,
    )
}

struct ArcSegment {
    from: (f64, f64),
    to: (f64, f64),
    rx: f64,
    ry: f64,
    rotation: f64,
    large_arc: bool,
    sweep: bool,
}

impl ArcSegment {
    /// Interior points of the arc, using the endpoint-to-centre conversion
    /// from the SVG implementation notes. Zero radii degrade to a line.
    fn samples(&self) -> Vec<(f64, f64)> {
        let (x1, y1) = self.from;
        let (x2, y2) = self.to;
        let mut rx = self.rx.abs();
        let mut ry = self.ry.abs();
        if rx == 0.0 || ry == 0.0 || (x1 == x2 && y1 == y2) {
            return Vec::new();
        }

        let (sin_phi, cos_phi) = self.rotation.to_radians().sin_cos();
        let dx2 = (x1 - x2) / 2.0;
        let dy2 = (y1 - y2) / 2.0;
        let x1p = cos_phi * dx2 + sin_phi * dy2;
        let y1p = -sin_phi * dx2 + cos_phi * dy2;

        let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
        if lambda > 1.0 {
            let scale = lambda.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
        let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
        let sign = if self.large_arc == self.sweep { -1.0 } else { 1.0 };
        let coef = if den == 0.0 { 0.0 } else { sign * (num / den).max(0.0).sqrt() };
        let cxp = coef * rx * y1p / ry;
        let cyp = -coef * ry * x1p / rx;
        let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
        let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

        let u = ((x1p - cxp) / rx, (y1p - cyp) / ry);
        let v = ((-x1p - cxp) / rx, (-y1p - cyp) / ry);
        let theta1 = vector_angle((1.0, 0.0), u);
        let mut delta = vector_angle(u, v);
        if !self.sweep && delta > 0.0 {
            delta -= TAU;
        } else if self.sweep && delta < 0.0 {
            delta += TAU;
        }

        sample_ts()
            .map(|t| {
                let theta = theta1 + delta * t;
                let (sin_t, cos_t) = theta.sin_cos();
                (
                    cx + rx * cos_phi * cos_t - ry * sin_phi * sin_t,
                    cy + rx * sin_phi * cos_t + ry * cos_phi * sin_t,
                )
            })
            .collect()
    }
}

fn vector_angle(u: (f64, f64), v: (f64, f64)) -> f64 {
    (u.0 * v.1 - u.1 * v.0).atan2(u.0 * v.0 + u.1 * v.1)
}

pub(crate) fn unescape_xml(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
