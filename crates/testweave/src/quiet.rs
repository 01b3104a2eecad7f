//! Suppress chatty environment-setup output by quiet level

use crate::options::QuietLevel;
use crate::stream::TextStream;
use regex::Regex;
use std::io;
use std::sync::LazyLock;

/// Line patterns and the minimum quiet level that suppresses them.
///
/// Patterns are anchored at the start of the write. A single trailing
/// newline is ignored when matching.
const FILTER_TABLE: &[(&str, u8)] = &[
    (r" $", 4),
    (r"django_jenkins$", 4),
    (r"admin$", 4),
    (r"admindocs$", 4),
    (r"auth$", 4),
    (r"contenttypes$", 4),
    (r"flatpages$", 4),
    (r"messages$", 4),
    (r"sessions$", 4),
    (r"sites$", 4),
    (r"catalog$", 4),
    (r"databrowser$", 4),
    (r"matching$", 4),
    (r"messagedispatch$", 4),
    (r"ordering$", 4),
    (r"partners$", 4),
    (r"reporting$", 4),
    (r"south$", 4),
    (r"Creating test database '", 4),
    (r"Loading 'initial_data' fixtures\.\.\.", 4),
    (r"No fixtures found\.", 4),
    (r"Creating table ", 3),
    (r"Processing \S+ model$", 2),
    (r"Adding permission '", 2),
    (r"Running post-sync handlers for application", 2),
    (r"Creating example\.com Site object$", 1),
    (r"No custom SQL for \S+ model$", 1),
    (r"Installing index for \S+ model$", 1),
    (r"Checking '\S+' for fixtures\.\.\.$", 1),
    (r"Trying '\S+' for initial_data\.\S+ fixture 'initial_data'\.\.\.$", 1),
    (r"No \w+ fixture 'initial_data' in ", 1),
    (r"Checking absolute path for fixtures\.\.\.", 1),
    (r"Trying absolute path for \S+ fixture 'initial_data'\.\.\.", 1),
];

static FILTERS: LazyLock<Vec<(Regex, u8)>> = LazyLock::new(|| {
    FILTER_TABLE
        .iter()
        .filter_map(|(pattern, level)| {
            Regex::new(&format!("^(?:{pattern})"))
                .ok()
                .map(|regex| (regex, *level))
        })
        .collect()
});

/// Whether a single write is suppressed at `level`
pub fn is_suppressed(text: &str, level: QuietLevel) -> bool {
    let line = text.strip_suffix('\n').unwrap_or(text);
    FILTERS
        .iter()
        .any(|(regex, min_level)| *min_level <= level.get() && regex.is_match(line))
}

/// A sink that drops known setup chatter before it reaches the inner one.
///
/// A lone `"\n"` following a suppressed write is dropped too, so no blank
/// line is left where the suppressed one was.
pub struct QuietStreamFilter<'a> {
    inner: &'a mut dyn TextStream,
    level: QuietLevel,
    filter_next_newline: bool,
}

impl<'a> QuietStreamFilter<'a> {
    pub fn new(inner: &'a mut dyn TextStream, level: QuietLevel) -> Self {
        Self {
            inner,
            level,
            filter_next_newline: false,
        }
    }
}

impl TextStream for QuietStreamFilter<'_> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if text == "\n" {
            let dropped = self.filter_next_newline;
            self.filter_next_newline = false;
            return if dropped { Ok(()) } else { self.inner.write_str(text) };
        }

        let suppressed = is_suppressed(text, self.level);
        if !suppressed {
            self.inner.write_str(text)?;
            self.inner.flush()?;
        }
        self.filter_next_newline = suppressed && !text.ends_with('\n');
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
