//! Command parsing for the textual write side.
//!
//! Lines are ASCII and space-delimited. The first token picks the verb,
//! matched case-sensitively; the verb decides how many argument tokens
//! follow. Anything after the consumed tokens is ignored.
//!
//! Tokens are clipped to fixed caps before they are looked at, the way
//! fixed-size scan buffers would clip them: 32 bytes for the verb, 10
//! for a numeric argument, 4 for the range argument. Argument range
//! checking (is 37 a valid rate code?) belongs to the device layer;
//! this module only gets a line into typed form, and a line that fails
//! here causes no device action at all.

use heapless::String;

/// Verb token cap in bytes
pub const MAX_COMMAND_LEN: usize = 32;

/// Numeric argument token cap (resolution, rate code)
pub const MAX_NUM_LEN: usize = 10;

/// Range argument token cap
pub const MAX_RANGE_LEN: usize = 4;

/// One parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Queue the device ID line for the next read
    Device,
    /// Re-apply the default device configuration
    Init,
    /// Run the offset self-calibration routine
    Calibrate,
    /// Change measurement resolution and range
    Format { resolution: u8, range: u16 },
    /// Change the output data rate code
    Rate { code: u8 },
}

/// Errors from turning a line into a [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line contained no tokens
    Empty,
    /// First token is not one of the five verbs
    UnknownCommand,
    /// Command needs an argument the line does not have
    MissingArgument,
    /// Argument did not parse as an unsigned decimal of its width
    InvalidNumber,
}

/// Parse one command line
pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let mut tokens = line.split_ascii_whitespace();
    let verb = tokens.next().ok_or(ParseError::Empty)?;

    match clipped::<MAX_COMMAND_LEN>(verb).as_str() {
        "device" => Ok(Command::Device),
        "init" => Ok(Command::Init),
        "calibrate" => Ok(Command::Calibrate),
        "format" => {
            let resolution = number::<u8, MAX_NUM_LEN>(tokens.next())?;
            let range = number::<u16, MAX_RANGE_LEN>(tokens.next())?;
            Ok(Command::Format { resolution, range })
        }
        "rate" => {
            let code = number::<u8, MAX_NUM_LEN>(tokens.next())?;
            Ok(Command::Rate { code })
        }
        _ => Err(ParseError::UnknownCommand),
    }
}

/// Clip a token to `N` bytes, dropping whatever does not fit
fn clipped<const N: usize>(token: &str) -> String<N> {
    let mut out = String::new();
    for ch in token.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

fn number<T: core::str::FromStr, const N: usize>(token: Option<&str>) -> Result<T, ParseError> {
    let token = token.ok_or(ParseError::MissingArgument)?;
    clipped::<N>(token)
        .parse()
        .map_err(|_| ParseError::InvalidNumber)
}
