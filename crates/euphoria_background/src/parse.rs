//! Background declaration parsing
//!
//! Parses the computed-style strings a browser reports for
//! `background-size`, `background-position`, `background-attachment` and
//! `background-image`. Parsing is lenient: anything unrecognised falls back
//! to the value a browser would use, never to an error.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_until},
    character::complete::{char, digit0, digit1, multispace0, one_of},
    combinator::{map_res, opt, recognize, value},
    error::VerboseError,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

// ============================================================================
// Lengths
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
enum Length {
    Px(f32),
    Percent(f32),
}

/// A signed decimal with an optional exponent, stopping at the first
/// character that cannot continue it (`10em` reads as `10`).
fn parse_number(input: &str) -> ParseResult<'_, f32> {
    map_res(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), digit0)))),
                recognize(pair(char('.'), digit1)),
            )),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        str::parse::<f32>,
    )(input)
}

/// A number with an optional `%` or `px` unit. Unknown units read as px.
fn parse_length(input: &str) -> ParseResult<'_, Length> {
    let (input, number) = parse_number(input)?;
    let (input, unit) = opt(alt((tag("%"), tag_no_case("px"))))(input)?;
    let length = match unit {
        Some("%") => Length::Percent(number),
        _ => Length::Px(number),
    };
    Ok((input, length))
}

/// First layer of a possibly comma-separated multi-background value
fn first_layer(value: &str) -> &str {
    value.split(',').next().unwrap_or("").trim()
}

// ============================================================================
// background-size
// ============================================================================

/// One axis of an explicit `background-size`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SizeToken {
    /// Derived from the other axis, or the natural size
    #[default]
    Auto,
    Px(f32),
    /// Percentage (0-100) of the container axis
    Percent(f32),
    /// Unrecognised token: use the natural image axis, else the container axis
    Natural,
}

impl SizeToken {
    /// Resolve to pixels, or `None` for `auto`
    pub fn resolve(self, container_axis: f32, natural_axis: f32) -> Option<f32> {
        match self {
            SizeToken::Auto => None,
            SizeToken::Px(px) => Some(px),
            SizeToken::Percent(pct) => Some(container_axis * pct / 100.0),
            SizeToken::Natural => Some(if natural_axis > 0.0 {
                natural_axis
            } else {
                container_axis
            }),
        }
    }
}

/// A parsed `background-size`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackgroundSize {
    Cover,
    Contain,
    Explicit { x: SizeToken, y: SizeToken },
}

impl Default for BackgroundSize {
    fn default() -> Self {
        BackgroundSize::Explicit {
            x: SizeToken::Auto,
            y: SizeToken::Auto,
        }
    }
}

/// Parse one size axis
pub fn parse_size_token(token: &str) -> SizeToken {
    let token = token.trim();
    if token.is_empty()
        || token.eq_ignore_ascii_case("auto")
        // A lone axis keyword only means something as the whole declaration
        || token.eq_ignore_ascii_case("cover")
        || token.eq_ignore_ascii_case("contain")
    {
        return SizeToken::Auto;
    }
    match parse_length(token) {
        Ok((_, Length::Px(px))) => SizeToken::Px(px),
        Ok((_, Length::Percent(pct))) => SizeToken::Percent(pct),
        Err(_) => SizeToken::Natural,
    }
}

/// Parse a full `background-size` value
pub fn parse_size(value: &str) -> BackgroundSize {
    let layer = first_layer(value);
    if layer.eq_ignore_ascii_case("cover") {
        return BackgroundSize::Cover;
    }
    if layer.eq_ignore_ascii_case("contain") {
        return BackgroundSize::Contain;
    }

    let mut tokens = layer.split_whitespace();
    let x = tokens.next().map(parse_size_token).unwrap_or_default();
    let y = tokens.next().map(parse_size_token).unwrap_or_default();
    BackgroundSize::Explicit { x, y }
}

// ============================================================================
// background-position
// ============================================================================

/// One axis of a `background-position`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PositionToken {
    /// Fraction (0-1) of the free space `container - drawn`
    Fraction(f32),
    /// Absolute offset in pixels
    Px(f32),
}

impl Default for PositionToken {
    fn default() -> Self {
        PositionToken::Fraction(0.5)
    }
}

impl PositionToken {
    /// Offset of the image's edge from the container's edge on this axis
    pub fn resolve(self, container_axis: f32, drawn_axis: f32) -> f32 {
        match self {
            PositionToken::Fraction(f) => (container_axis - drawn_axis) * f,
            PositionToken::Px(px) => px,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Either,
}

fn parse_keyword(input: &str) -> ParseResult<'_, (f32, Axis)> {
    alt((
        value((0.0, Axis::Horizontal), tag_no_case("left")),
        value((1.0, Axis::Horizontal), tag_no_case("right")),
        value((0.0, Axis::Vertical), tag_no_case("top")),
        value((1.0, Axis::Vertical), tag_no_case("bottom")),
        value((0.5, Axis::Either), tag_no_case("center")),
    ))(input)
}

fn classify_position(token: &str) -> (PositionToken, Axis) {
    let token = token.trim();
    if let Ok((rest, (fraction, axis))) = parse_keyword(token) {
        if rest.is_empty() {
            return (PositionToken::Fraction(fraction), axis);
        }
    }
    match parse_length(token) {
        Ok((_, Length::Percent(pct))) => (PositionToken::Fraction(pct / 100.0), Axis::Either),
        Ok((_, Length::Px(px))) => (PositionToken::Px(px), Axis::Either),
        Err(_) => (PositionToken::default(), Axis::Either),
    }
}

/// Parse one position axis. Unknown tokens centre.
pub fn parse_position_token(token: &str) -> PositionToken {
    classify_position(token).0
}

/// A parsed `background-position`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundPosition {
    pub x: PositionToken,
    pub y: PositionToken,
}

impl BackgroundPosition {
    pub const fn new(x: PositionToken, y: PositionToken) -> Self {
        Self { x, y }
    }
}

/// Parse a `background-position` value.
///
/// Missing axes default to `50%`. Keyword pairs given vertical-first
/// (`top left`, `bottom right`) are reordered.
pub fn parse_position(value: &str) -> BackgroundPosition {
    let mut tokens = first_layer(value).split_whitespace();
    let first = tokens.next().map(classify_position);
    let second = tokens.next().map(classify_position);

    match (first, second) {
        (None, _) => BackgroundPosition::default(),
        (Some((token, Axis::Vertical)), None) => {
            BackgroundPosition::new(PositionToken::default(), token)
        }
        (Some((token, _)), None) => BackgroundPosition::new(token, PositionToken::default()),
        (Some((a, axis_a)), Some((b, axis_b))) => {
            if axis_a == Axis::Vertical || axis_b == Axis::Horizontal {
                BackgroundPosition::new(b, a)
            } else {
                BackgroundPosition::new(a, b)
            }
        }
    }
}

// ============================================================================
// background-attachment
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Attachment {
    #[default]
    Scroll,
    /// Positioned against the viewport
    Fixed,
    Local,
}

pub fn parse_attachment(value: &str) -> Attachment {
    let layer = first_layer(value);
    if layer.eq_ignore_ascii_case("fixed") {
        Attachment::Fixed
    } else if layer.eq_ignore_ascii_case("local") {
        Attachment::Local
    } else {
        Attachment::Scroll
    }
}

// ============================================================================
// background-image
// ============================================================================

fn parse_url(input: &str) -> ParseResult<'_, &str> {
    preceded(
        take_until("url("),
        delimited(tag("url("), take_until(")"), char(')')),
    )(input)
}

fn strip_quotes(raw: &str) -> &str {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('"')
        .or_else(|| raw.strip_prefix('\''))
        .unwrap_or(raw);
    raw.strip_suffix('"')
        .or_else(|| raw.strip_suffix('\''))
        .unwrap_or(raw)
}

/// Pull the first URL out of a `background-image` value.
///
/// Handles `url("a")`, `url('a')` and `url(a)`. Returns `None` for `none`,
/// gradients, or an empty URL.
pub fn extract_image_url(value: &str) -> Option<String> {
    let (_, raw) = preceded(multispace0, parse_url)(value).ok()?;
    let url = strip_quotes(raw).trim();
    (!url.is_empty()).then(|| url.to_string())
}

/// Format a URL as a CSS `url(...)` value
pub fn css_url(url: &str) -> String {
    format!("url({url})")
}
