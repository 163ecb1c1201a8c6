//! Caller location resolution.
//!
//! A [`CallerResolver`] produces the raw frames above a log call, innermost
//! first. [`describe_frames`] turns them into the `file:line[:function()]`
//! text that every sink reports, applying the ignore list, the runtime
//! sentinels and the depth bound.

use std::fmt;
use std::panic::Location;
use std::path::Path;

use crate::config::LoggerConfig;

/// Maximum number of stack levels inspected in multi-frame mode.
pub const MAX_STACK_DEPTH: usize = 10;

/// File names that mark the edge of user code. Reaching one ends the walk.
const RUNTIME_SENTINELS: &[&str] = &["", "<autogenerated>", "function.rs", "rt.rs", "panicking.rs"];

/// Path fragments of toolchain and registry sources. Frames from these are
/// runtime or framework internals and also end the walk.
const RUNTIME_PATHS: &[&str] = &["/rustc/", "\\rustc\\", "/.cargo/registry/", "\\.cargo\\registry\\"];

/// One resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    /// Source path as reported by debug info, possibly absolute.
    pub file: String,
    pub line: u32,
    /// Fully qualified function path, e.g. `my_app::jobs::run`.
    pub function: Option<String>,
}

impl CallerFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        CallerFrame {
            file: file.into(),
            line,
            function: None,
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// File name without its directories.
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(|c| c == '/' || c == '\\')
            .next()
            .unwrap_or_default()
    }

    /// Last path segment of the function, skipping closure markers.
    pub fn function_name(&self) -> Option<&str> {
        let function = self.function.as_deref()?;
        function
            .rsplit("::")
            .find(|segment| !segment.starts_with("{{"))
            .or(Some(function))
    }

    fn describe(&self, include_function: bool) -> String {
        match self.function_name().filter(|_| include_function) {
            Some(function) => format!("{}:{}:{}()", self.file_name(), self.line, function),
            None => format!("{}:{}", self.file_name(), self.line),
        }
    }

    fn is_runtime_sentinel(&self) -> bool {
        RUNTIME_SENTINELS.contains(&self.file_name())
            || RUNTIME_PATHS.iter().any(|p| self.file.contains(p))
    }

    fn is_own_source(&self) -> bool {
        Path::new(&self.file).starts_with(Path::new(env!("CARGO_MANIFEST_DIR")).join("src"))
    }
}

/// Source of the frames above a log call.
///
/// `origin` is the `#[track_caller]` location of the public log call; the
/// returned frames start at the frame containing it and continue outward.
pub trait CallerResolver: Send + Sync {
    fn frames(&self, origin: &'static Location<'static>) -> Vec<CallerFrame>;
}

/// Resolves frames by walking the real call stack.
///
/// Frames are captured with the `backtrace` crate. Everything inside the
/// logger is dropped by scanning for the frame whose file and line match
/// `origin`. When debug info is missing and no frame matches, the origin
/// location alone is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackResolver;

impl CallerResolver for StackResolver {
    fn frames(&self, origin: &'static Location<'static>) -> Vec<CallerFrame> {
        let origin_file = Path::new(origin.file());
        let mut frames: Vec<CallerFrame> = Vec::new();
        let mut anchored = false;

        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                let file = symbol.filename();
                let line = symbol.lineno().unwrap_or(0);
                if !anchored {
                    anchored = file.is_some_and(|f| f.ends_with(origin_file)) && line == origin.line();
                    if !anchored {
                        return;
                    }
                }
                frames.push(CallerFrame {
                    file: file.map(|f| f.display().to_string()).unwrap_or_default(),
                    line,
                    function: symbol.name().map(|name| format!("{:#}", name)),
                });
            });
            frames.len() < MAX_STACK_DEPTH
        });

        if frames.is_empty() {
            frames.push(CallerFrame::new(origin.file(), origin.line()));
        }
        frames
    }
}

/// Returns a fixed set of frames regardless of the call site.
#[derive(Clone, Debug, Default)]
pub struct FixedResolver {
    frames: Vec<CallerFrame>,
}

impl FixedResolver {
    pub fn new(frames: Vec<CallerFrame>) -> Self {
        FixedResolver { frames }
    }
}

impl CallerResolver for FixedResolver {
    fn frames(&self, _origin: &'static Location<'static>) -> Vec<CallerFrame> {
        self.frames.clone()
    }
}

/// Render resolved frames as the caller location string.
///
/// Single-frame mode reports the innermost frame only. Otherwise frames are
/// walked outward for at most [`MAX_STACK_DEPTH`] levels until a runtime
/// sentinel; frames from this crate or from `config.ignored_files` are
/// skipped. Outer frames are placed before inner ones, so the innermost
/// frame (the only one annotated with its function) ends the list.
pub fn describe_frames(frames: &[CallerFrame], config: &LoggerConfig) -> String {
    if config.single_frame {
        return frames
            .first()
            .map(|frame| frame.describe(config.include_function))
            .unwrap_or_default();
    }

    let mut files = String::new();
    let mut annotated = false;
    for frame in frames.iter().take(MAX_STACK_DEPTH) {
        if frame.is_runtime_sentinel() {
            break;
        }
        if frame.is_own_source() || config.ignored_files.contains(frame.file_name()) {
            continue;
        }
        let entry = if annotated {
            frame.describe(false)
        } else {
            annotated = true;
            frame.describe(config.include_function)
        };
        files = if files.is_empty() {
            entry
        } else {
            format!("{},{}", entry, files)
        };
    }
    files
}

/// Bracketed caller tag plus the padding that aligns it to a fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerTag {
    pub bracketed: String,
    pub padding: usize,
}

impl fmt::Display for CallerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:width$}", self.bracketed, "", width = self.padding)
    }
}

/// Bracket `files` as `[files]`, fitted to `width` characters when given.
///
/// Longer tags keep the rightmost characters (the innermost frames); shorter
/// ones get trailing padding.
pub fn bracket_caller(files: &str, width: Option<usize>) -> CallerTag {
    let bracketed = format!("[{}]", files);
    let width = match width {
        Some(width) => width,
        None => {
            return CallerTag {
                bracketed,
                padding: 0,
            }
        }
    };

    let len = files.chars().count() + 2;
    if len > width {
        let keep = width.saturating_sub(2);
        let tail: String = files.chars().skip(len - 2 - keep).collect();
        CallerTag {
            bracketed: format!("[{}]", tail),
            padding: 0,
        }
    } else {
        CallerTag {
            bracketed,
            padding: width - len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames() -> Vec<CallerFrame> {
        vec![
            CallerFrame::new("/app/src/handlers.rs", 42).with_function("app::handlers::create_user"),
            CallerFrame::new("/app/src/router.rs", 17).with_function("app::router::dispatch"),
            CallerFrame::new("/app/src/main.rs", 9).with_function("app::main"),
            CallerFrame::new("/rustc/abc/library/core/src/ops/function.rs", 250),
            CallerFrame::new("/app/src/never.rs", 1),
        ]
    }

    #[test]
    fn walks_outward_until_runtime_sentinel() {
        let config = LoggerConfig::default();
        assert_eq!(
            describe_frames(&frames(), &config),
            "main.rs:9,router.rs:17,handlers.rs:42:create_user()"
        );
    }

    #[test]
    fn function_annotation_can_be_disabled() {
        let mut config = LoggerConfig::default();
        config.include_function = false;
        assert_eq!(
            describe_frames(&frames(), &config),
            "main.rs:9,router.rs:17,handlers.rs:42"
        );
    }

    #[test]
    fn ignored_files_are_skipped_without_stopping() {
        let mut config = LoggerConfig::default();
        config.ignore_file("handlers.rs");
        let described = describe_frames(&frames(), &config);
        assert!(!described.contains("handlers.rs"));
        assert_eq!(described, "main.rs:9,router.rs:17:dispatch()");
    }

    #[test]
    fn own_source_frames_are_skipped() {
        let own = format!("{}/src/logger.rs", env!("CARGO_MANIFEST_DIR"));
        let stack = vec![
            CallerFrame::new(own, 100).with_function("fanout_logger::logger::Logger::info"),
            CallerFrame::new("/app/src/main.rs", 3).with_function("app::main"),
        ];
        assert_eq!(describe_frames(&stack, &LoggerConfig::default()), "main.rs:3:main()");
    }

    #[test]
    fn empty_file_name_ends_the_walk() {
        let stack = vec![
            CallerFrame::new("/app/src/a.rs", 1),
            CallerFrame::new("", 0),
            CallerFrame::new("/app/src/b.rs", 2),
        ];
        let mut config = LoggerConfig::default();
        config.include_function = false;
        assert_eq!(describe_frames(&stack, &config), "a.rs:1");
    }

    #[test]
    fn walk_is_depth_bounded() {
        let stack: Vec<CallerFrame> = (0..20)
            .map(|i| CallerFrame::new(format!("/app/src/f{i}.rs"), i))
            .collect();
        let mut config = LoggerConfig::default();
        config.include_function = false;
        let described = describe_frames(&stack, &config);
        assert_eq!(described.split(',').count(), MAX_STACK_DEPTH);
        assert!(described.starts_with("f9.rs:9,"));
    }

    #[test]
    fn single_frame_mode_reports_innermost_only() {
        let mut config = LoggerConfig::default();
        config.single_frame = true;
        assert_eq!(describe_frames(&frames(), &config), "handlers.rs:42:create_user()");
        config.include_function = false;
        assert_eq!(describe_frames(&frames(), &config), "handlers.rs:42");
        assert_eq!(describe_frames(&[], &config), "");
    }

    #[test]
    fn closure_frames_report_the_enclosing_function() {
        let frame = CallerFrame::new("src/jobs.rs", 5).with_function("app::jobs::run::{{closure}}");
        assert_eq!(frame.function_name(), Some("run"));
    }

    #[test]
    fn long_tags_keep_rightmost_characters() {
        let tag = bracket_caller("main.rs:9,handlers.rs:42", Some(10));
        assert_eq!(tag.bracketed, "[rs.rs:42]");
        assert_eq!(tag.padding, 0);
        assert_eq!(tag.to_string().chars().count(), 10);
    }

    #[test]
    fn short_tags_are_padded_to_width() {
        let tag = bracket_caller("a.rs:1", Some(12));
        assert_eq!(tag.bracketed, "[a.rs:1]");
        assert_eq!(tag.to_string(), "[a.rs:1]    ");
        assert_eq!(bracket_caller("a.rs:1", None).to_string(), "[a.rs:1]");
    }

    #[test]
    fn stack_resolver_anchors_on_the_call_site() {
        let frames = StackResolver.frames(Location::caller());
        assert!(!frames.is_empty());
        assert!(frames[0].file.ends_with("caller.rs"), "{:?}", frames[0]);
    }
}
