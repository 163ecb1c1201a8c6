//! Caller resolution against the real call stack, through the default
//! resolver of a built logger.

mod common;

use fanout_logger::memory_sink::MemorySink;
use fanout_logger::{Logger, LoggerConfig};

fn stack_logger(config: LoggerConfig) -> (Logger, MemorySink) {
    let memory = MemorySink::new();
    let logger = Logger::builder()
        .config(LoggerConfig {
            console_enabled: false,
            ..config
        })
        .sink(memory.clone())
        .build();
    (logger, memory)
}

#[inline(never)]
fn inner(logger: &Logger) -> u32 {
    let line = line!() + 1;
    logger.info("from inner");
    line
}

#[inline(never)]
fn outer(logger: &Logger) -> (u32, u32) {
    let line = line!() + 1;
    let inner_line = inner(logger);
    (line, inner_line)
}

#[test]
fn nested_calls_are_listed_outermost_first() {
    let (logger, memory) = stack_logger(LoggerConfig::default());
    let (outer_line, inner_line) = outer(&logger);

    let records = memory.records();
    assert_eq!(records.len(), 1);
    let caller = &records[0].caller;
    let expected = format!(
        "stack_caller.rs:{},stack_caller.rs:{}:inner()",
        outer_line, inner_line
    );
    assert!(caller.ends_with(&expected), "caller was {:?}", caller);
    assert!(!caller.contains("logger.rs"), "caller was {:?}", caller);
    assert!(!caller.contains("function.rs"), "caller was {:?}", caller);
}

#[test]
fn single_frame_reports_the_log_call_only() {
    let (logger, memory) = stack_logger(LoggerConfig {
        single_frame: true,
        ..LoggerConfig::default()
    });
    let (_, inner_line) = outer(&logger);

    assert_eq!(
        memory.records()[0].caller,
        format!("stack_caller.rs:{}:inner()", inner_line)
    );
}

#[test]
fn function_annotation_can_be_switched_off() {
    let (logger, memory) = stack_logger(LoggerConfig {
        single_frame: true,
        include_function: false,
        ..LoggerConfig::default()
    });
    let (_, inner_line) = outer(&logger);

    assert_eq!(
        memory.records()[0].caller,
        format!("stack_caller.rs:{}", inner_line)
    );
}

#[test]
fn wrapper_frames_show_up_until_their_file_is_ignored() {
    let (logger, memory) = stack_logger(LoggerConfig::default());
    let call_line = line!() + 1;
    let wrapper_line = common::log_through_wrapper(&logger);

    let caller = memory.records()[0].caller.clone();
    let expected = format!(
        "stack_caller.rs:{},mod.rs:{}:log_through_wrapper()",
        call_line, wrapper_line
    );
    assert!(caller.ends_with(&expected), "caller was {:?}", caller);

    memory.clear();
    logger.configure(|config| {
        config.ignore_file("mod.rs");
    });
    let call_line = line!() + 1;
    common::log_through_wrapper(&logger);

    let caller = memory.records()[0].caller.clone();
    let expected = format!(
        "stack_caller.rs:{}:wrapper_frames_show_up_until_their_file_is_ignored()",
        call_line
    );
    assert!(caller.ends_with(&expected), "caller was {:?}", caller);
    assert!(!caller.contains("mod.rs"), "caller was {:?}", caller);
}
