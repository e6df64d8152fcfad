//! Reply formatting for the textual read side.
//!
//! Every read produces exactly one line. The normal line carries the
//! latest reading in mg; a `device` command queues a one-shot ID line
//! that is served ahead of it.

use core::fmt::Write;

use heapless::String;

/// Reply line cap in bytes, terminator included
pub const MAX_REPLY_LEN: usize = 32;

/// A bounded reply line
pub type ReplyLine = String<MAX_REPLY_LEN>;

/// Format the reading line: `<new_data> <x> <y> <z> <scale>\n`
///
/// `new_data` is 1 when the mg values were sampled on this poll, 0 when
/// they repeat the previous reading. All fields are decimal.
pub fn reading_line(new_data: bool, mg: [i16; 3], scale: u8) -> ReplyLine {
    let mut line = ReplyLine::new();
    // Worst case "1 -32768 -32768 -32768 255\n" is 27 bytes, inside the cap
    let _ = write!(
        line,
        "{} {} {} {} {}\n",
        new_data as u8, mg[0], mg[1], mg[2], scale
    );
    line
}

/// Format the device ID line: lowercase hex plus newline, e.g. `e5`
pub fn device_id_line(id: u8) -> ReplyLine {
    let mut line = ReplyLine::new();
    let _ = write!(line, "{:x}\n", id);
    line
}
