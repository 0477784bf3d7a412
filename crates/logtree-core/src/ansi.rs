//! ANSI escape code handling utilities
//!
//! Turns SGR color sequences into flat styled segments for rendering, and
//! strips escape sequences for plain-text output.
//!
//! Log producers frequently write the escape character as literal text
//! (`\033[`, `\x1b[`, `\u001b[`, `\e[`, or caret notation `^[[`). Those
//! spellings are normalised to the real ESC control character before
//! scanning.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

const ESC: char = '\x1b';

/// Literal spellings of ESC that introduce a CSI sequence
static LITERAL_ESCAPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\\(?:033|x1[bB]|u001[bB]|e)|\^\[)\[")
        .expect("Literal escape regex pattern is valid")
});

/// CSI sequences: ESC [ params final-letter
///
/// Only `m` (SGR) sequences carry meaning here; every other CSI sequence is
/// consumed and dropped.
static CSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[([0-9;?]*)([A-Za-z])").expect("CSI regex pattern is valid")
});

/// The sixteen foreground colors with a fixed palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl AnsiColor {
    const NORMAL: [AnsiColor; 8] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
    ];

    const BRIGHT: [AnsiColor; 8] = [
        AnsiColor::BrightBlack,
        AnsiColor::BrightRed,
        AnsiColor::BrightGreen,
        AnsiColor::BrightYellow,
        AnsiColor::BrightBlue,
        AnsiColor::BrightMagenta,
        AnsiColor::BrightCyan,
        AnsiColor::BrightWhite,
    ];

    /// Map an SGR foreground code (30–37, 90–97)
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            30..=37 => Some(Self::NORMAL[(code - 30) as usize]),
            90..=97 => Some(Self::BRIGHT[(code - 90) as usize]),
            _ => None,
        }
    }

    /// CSS color used for inline spans
    pub fn hex(&self) -> &'static str {
        match self {
            AnsiColor::Black => "#3b4252",
            AnsiColor::Red => "#cc3e44",
            AnsiColor::Green => "#3f9f4f",
            AnsiColor::Yellow => "#b58900",
            AnsiColor::Blue => "#3a6fc4",
            AnsiColor::Magenta => "#a63fa6",
            AnsiColor::Cyan => "#2a9d9d",
            AnsiColor::White => "#8a8f98",
            AnsiColor::BrightBlack => "#6b7280",
            AnsiColor::BrightRed => "#ef4444",
            AnsiColor::BrightGreen => "#22c55e",
            AnsiColor::BrightYellow => "#eab308",
            AnsiColor::BrightBlue => "#3b82f6",
            AnsiColor::BrightMagenta => "#d946ef",
            AnsiColor::BrightCyan => "#06b6d4",
            AnsiColor::BrightWhite => "#e5e7eb",
        }
    }
}

/// A run of text sharing one foreground color (or none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSegment {
    pub text: String,
    pub color: Option<AnsiColor>,
}

/// Replace literal escape spellings (`\033[`, `^[[`, ...) with a real ESC
pub fn normalize_escapes(input: &str) -> Cow<'_, str> {
    LITERAL_ESCAPE_PATTERN.replace_all(input, "\x1b[")
}

/// Decode SGR color sequences into flat segments.
///
/// - `0` or an empty parameter list resets (closes the open color)
/// - 30–37 / 90–97 switch to a new color; spans never nest
/// - everything else (bold, background, 256-color, cursor movement) is consumed
/// - an unterminated color simply ends with the text
pub fn decode(input: &str) -> Vec<StyledSegment> {
    let normalized = normalize_escapes(input);
    let text = normalized.as_ref();

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut color: Option<AnsiColor> = None;
    let mut last = 0;

    for caps in CSI_PATTERN.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut current, &text[last..whole.start()]);
        last = whole.end();

        if &caps[2] != "m" {
            continue;
        }

        let next = apply_sgr(color, &caps[1]);
        if next != color {
            flush(&mut segments, &mut current, color);
            color = next;
        }
    }
    push_text(&mut current, &text[last..]);
    flush(&mut segments, &mut current, color);

    segments
}

/// Fold one SGR parameter list into the current color
fn apply_sgr(mut color: Option<AnsiColor>, params: &str) -> Option<AnsiColor> {
    // An empty parameter means 0; anything unparsable is ignored
    let codes: Vec<u32> = params
        .split(';')
        .map(|p| if p.is_empty() { 0 } else { p.parse().unwrap_or(u32::MAX) })
        .collect();

    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 | 39 => color = None,
            38 | 48 => {
                // Extended color: 38;5;n or 38;2;r;g;b, consumed without effect
                i += match codes.get(i + 1) {
                    Some(5) => 2,
                    Some(2) => 4,
                    _ => 0,
                };
            }
            code => {
                if let Some(c) = AnsiColor::from_code(code) {
                    color = Some(c);
                }
            }
        }
        i += 1;
    }
    color
}

fn push_text(current: &mut String, text: &str) {
    // Stray ESC bytes that did not form a recognized sequence are dropped
    current.extend(text.chars().filter(|&c| c != ESC));
}

fn flush(segments: &mut Vec<StyledSegment>, current: &mut String, color: Option<AnsiColor>) {
    if !current.is_empty() {
        segments.push(StyledSegment {
            text: std::mem::take(current),
            color,
        });
    }
}

/// Strip all escape sequences, keeping only visible text
pub fn strip_ansi_codes(input: &str) -> String {
    decode(input).into_iter().map(|s| s.text).collect()
}
