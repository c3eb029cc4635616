//! Lightweight, nestable wall-clock tracing for performance-sensitive code.
//!
//! The `print-trace` feature turns [`start_timer!`] / [`end_timer!`] into a
//! colored, indentation-aware trace printed to stderr; without the feature
//! the macros compile away to nothing, so call sites never pay for tracing
//! they didn't opt into.

#[cfg(feature = "print-trace")]
use colored::Colorize;
#[cfg(feature = "print-trace")]
use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Instant,
};

#[cfg(feature = "print-trace")]
pub static NUM_INDENT: AtomicUsize = AtomicUsize::new(0);
#[cfg(feature = "print-trace")]
pub const PAD_CHAR: &str = "·";

#[cfg(feature = "print-trace")]
pub struct TimerInfo {
    pub msg: String,
    pub time: Instant,
}

/// Starts a new, possibly nested, timer and prints its label immediately.
///
/// Usage: `let timer = start_timer!(|| "descriptive label");`
#[macro_export]
macro_rules! start_timer {
    ($msg:expr) => {{
        #[cfg(feature = "print-trace")]
        {
            use $crate::{NUM_INDENT, PAD_CHAR, TimerInfo};
            use std::sync::atomic::Ordering;

            let msg = $msg();
            let indent_amount = 2 * NUM_INDENT.fetch_add(1, Ordering::Relaxed);
            let start_msg = "Start:".yellow().bold();
            let msg = format!("{}{} {}", PAD_CHAR.repeat(indent_amount), start_msg, msg);
            println!("{}", msg);
            TimerInfo {
                msg: msg.to_string(),
                time: std::time::Instant::now(),
            }
        }
        #[cfg(not(feature = "print-trace"))]
        {
            ()
        }
    }};
}

/// Ends a timer previously returned by [`start_timer!`], printing the
/// elapsed wall-clock time at the same indentation level it started at.
#[macro_export]
macro_rules! end_timer {
    ($time:expr) => {{
        #[cfg(feature = "print-trace")]
        {
            use $crate::{NUM_INDENT, PAD_CHAR};
            use colored::Colorize;
            use std::sync::atomic::Ordering;

            let time = $time.time;
            let final_time = time.elapsed();

            let indent_amount = 2 * NUM_INDENT.fetch_sub(1, Ordering::Relaxed);
            let end_msg = "End:".green().bold();
            let message = format!(
                "{}{} {} {}",
                PAD_CHAR.repeat(indent_amount),
                end_msg,
                $time.msg.trim_start_matches(|c: char| c == ' ' || c == '·'),
                format!("{:?}", final_time).cyan()
            );
            println!("{}", message);
        }
        #[cfg(not(feature = "print-trace"))]
        {
            let _ = $time;
        }
    }};
}

/// Adds a one-line note into the trace at the current indentation level.
#[macro_export]
macro_rules! add_to_trace {
    ($title:expr, $msg:expr) => {{
        #[cfg(feature = "print-trace")]
        {
            use $crate::{NUM_INDENT, PAD_CHAR};
            use colored::Colorize;
            use std::sync::atomic::Ordering;

            let indent_amount = 2 * NUM_INDENT.load(Ordering::Relaxed);
            let title = format!("{}", $title());
            let title = title.bold();
            let mut final_message = format!("{}{}: {}\n", PAD_CHAR.repeat(indent_amount), title, $msg());
            if !final_message.ends_with('\n') {
                final_message.push('\n');
            }
            print!("{}", final_message);
        }
        #[cfg(not(feature = "print-trace"))]
        {
            ()
        }
    }};
}
