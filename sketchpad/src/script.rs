//! # Gesture scripts
//!
//! A line-oriented text format standing in for a live pointer and toolbar. One command per line.
//! Lines starting with `#` are comments, and blank lines are ignored:
//!
//! ```text
//! color red
//! brush large
//! line 10 10 200 200 32
//! tap 50 50
//! undo
//! export out.png
//! ```
//!
//! `tap` and `line` expand into the pointer events a finger would produce.

use crate::toolbar::{BrushSize, Panel};
use sketchpad_core::{
    color::{Color, ColorParseError},
    Point, PointerEvent,
};

/// Moves emitted by `line` if no count is given.
pub const DEFAULT_LINE_STEPS: u32 = 16;
/// Most moves a single `line` may expand into.
pub const MAX_LINE_STEPS: u32 = 4096;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command} takes {} argument(s), found {found}", count_range(.min, .max))]
    ArgumentCount {
        command: &'static str,
        min: usize,
        max: usize,
        found: usize,
    },
    #[error("{0:?} is not a number")]
    BadNumber(String),
    #[error(transparent)]
    BadColor(#[from] ColorParseError),
    #[error("unknown brush size {0:?}, expected small, medium, or large")]
    BadBrush(String),
    #[error("unknown panel {0:?}, expected brush-size, palette, or none")]
    BadPanel(String),
    #[error("expected expand or collapse, found {0:?}")]
    BadToolbar(String),
    #[error("line needs at least one step")]
    ZeroSteps,
    #[error("line has {0} steps, at most {max} are allowed", max = MAX_LINE_STEPS)]
    TooManySteps(u32),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based.
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Pointer(PointerEvent),
    Color(Color),
    /// Index into the configured palette.
    Swatch(usize),
    Width(f32),
    Brush(BrushSize),
    Panel(Panel),
    /// `true` to expand.
    Toolbar(bool),
    Undo,
    Clear,
    Resize { width: u32, height: u32 },
    /// `None` for a plain background.
    Background(Option<Color>),
    BackgroundImage(std::path::PathBuf),
    /// Export to this path, or a generated one.
    Export(Option<std::path::PathBuf>),
}

/// An action and the line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub line: usize,
    pub action: Action,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Script {
    steps: Vec<Step>,
}
impl Script {
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
impl std::str::FromStr for Script {
    type Err = ParseError;
    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let mut steps = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;
            parse_line(line, &mut |action| {
                steps.push(Step {
                    line: line_number,
                    action,
                });
            })
            .map_err(|kind| ParseError {
                line: line_number,
                kind,
            })?;
        }
        Ok(Self { steps })
    }
}

fn parse_line(line: &str, emit: &mut impl FnMut(Action)) -> Result<(), ParseErrorKind> {
    if line.trim_start().starts_with('#') {
        return Ok(());
    }
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(());
    };
    let args: Vec<&str> = words.collect();

    match command {
        "down" => {
            let [x, y] = numbers("down", &args)?;
            emit(Action::Pointer(PointerEvent::Down(Point::new(x, y))));
        }
        "move" => {
            let [x, y] = numbers("move", &args)?;
            emit(Action::Pointer(PointerEvent::Move(Point::new(x, y))));
        }
        "up" => {
            arity("up", &args, 0, 0)?;
            emit(Action::Pointer(PointerEvent::Up));
        }
        "cancel" => {
            arity("cancel", &args, 0, 0)?;
            emit(Action::Pointer(PointerEvent::Cancel));
        }
        "tap" => {
            let [x, y] = numbers("tap", &args)?;
            emit(Action::Pointer(PointerEvent::Down(Point::new(x, y))));
            emit(Action::Pointer(PointerEvent::Up));
        }
        "line" => {
            arity("line", &args, 4, 5)?;
            let [x0, y0, x1, y1] = numbers("line", &args[..4])?;
            let steps = match args.get(4) {
                None => DEFAULT_LINE_STEPS,
                Some(steps) => {
                    let [steps] = parse_args::<u32, 1>("line", &[*steps])?;
                    steps
                }
            };
            if steps == 0 {
                return Err(ParseErrorKind::ZeroSteps);
            }
            if steps > MAX_LINE_STEPS {
                return Err(ParseErrorKind::TooManySteps(steps));
            }
            let from = Point::new(x0, y0);
            let to = Point::new(x1, y1);
            emit(Action::Pointer(PointerEvent::Down(from)));
            for step in 1..=steps {
                let t = step as f32 / steps as f32;
                emit(Action::Pointer(PointerEvent::Move(Point::new(
                    from.x + (to.x - from.x) * t,
                    from.y + (to.y - from.y) * t,
                ))));
            }
            emit(Action::Pointer(PointerEvent::Up));
        }
        "color" => {
            let [color] = words_n("color", &args)?;
            emit(Action::Color(color.parse()?));
        }
        "swatch" => {
            let [idx] = parse_args("swatch", &args)?;
            emit(Action::Swatch(idx));
        }
        "width" => {
            let [width] = numbers("width", &args)?;
            emit(Action::Width(width));
        }
        "brush" => {
            let [size] = words_n("brush", &args)?;
            let size = size
                .parse()
                .map_err(|_| ParseErrorKind::BadBrush(size.to_owned()))?;
            emit(Action::Brush(size));
        }
        "panel" => {
            let [panel] = words_n("panel", &args)?;
            let panel = panel
                .parse()
                .map_err(|_| ParseErrorKind::BadPanel(panel.to_owned()))?;
            emit(Action::Panel(panel));
        }
        "toolbar" => {
            let [state] = words_n("toolbar", &args)?;
            let expand = match state {
                "expand" => true,
                "collapse" => false,
                other => return Err(ParseErrorKind::BadToolbar(other.to_owned())),
            };
            emit(Action::Toolbar(expand));
        }
        "undo" => {
            arity("undo", &args, 0, 0)?;
            emit(Action::Undo);
        }
        "clear" => {
            arity("clear", &args, 0, 0)?;
            emit(Action::Clear);
        }
        "resize" => {
            let [width, height] = parse_args("resize", &args)?;
            emit(Action::Resize { width, height });
        }
        "background" => {
            let [value] = words_n("background", &args)?;
            let color = if value.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(value.parse()?)
            };
            emit(Action::Background(color));
        }
        "background-image" => {
            let path = rest_of_line(line, command);
            if path.is_empty() {
                return Err(ParseErrorKind::ArgumentCount {
                    command: "background-image",
                    min: 1,
                    max: 1,
                    found: 0,
                });
            }
            emit(Action::BackgroundImage(path.into()));
        }
        "export" => {
            let path = rest_of_line(line, command);
            emit(Action::Export((!path.is_empty()).then(|| path.into())));
        }
        other => return Err(ParseErrorKind::UnknownCommand(other.to_owned())),
    }
    Ok(())
}

/// Paths may contain spaces, so take everything after the command verbatim.
fn rest_of_line<'a>(line: &'a str, command: &str) -> &'a str {
    line.trim_start()
        .strip_prefix(command)
        .unwrap_or_default()
        .trim()
}

fn arity(
    command: &'static str,
    args: &[&str],
    min: usize,
    max: usize,
) -> Result<(), ParseErrorKind> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(ParseErrorKind::ArgumentCount {
            command,
            min,
            max,
            found: args.len(),
        })
    }
}

fn words_n<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ParseErrorKind> {
    arity(command, args, N, N)?;
    args.try_into().map_err(|_| ParseErrorKind::ArgumentCount {
        command,
        min: N,
        max: N,
        found: args.len(),
    })
}

fn parse_args<T: std::str::FromStr, const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[T; N], ParseErrorKind> {
    let words: [&str; N] = words_n(command, args)?;
    let values = words
        .iter()
        .map(|word| {
            word.parse::<T>()
                .map_err(|_| ParseErrorKind::BadNumber((*word).to_owned()))
        })
        .collect::<Result<Vec<T>, _>>()?;
    // Length was checked by `words_n`.
    values.try_into().map_err(|_| ParseErrorKind::ArgumentCount {
        command,
        min: N,
        max: N,
        found: args.len(),
    })
}

/// Finite numbers only.
fn numbers<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> Result<[f32; N], ParseErrorKind> {
    let numbers: [f32; N] = parse_args(command, args)?;
    if let Some(idx) = numbers.iter().position(|n| !n.is_finite()) {
        return Err(ParseErrorKind::BadNumber(args[idx].to_owned()));
    }
    Ok(numbers)
}

fn count_range(min: &usize, max: &usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{min} to {max}")
    }
}
