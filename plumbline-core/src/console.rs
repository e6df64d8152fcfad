//! Command console: dispatch plus the one-line read side
//!
//! The host hands complete lines to [`Console::handle_line`] and drains
//! one reply per [`Console::poll_line`]. The only queued reply is the
//! device ID line, served ahead of the next reading and at most once
//! per `device` command.

use plumbline_protocol::{device_id_line, parse_line, reading_line, Command, ParseError, ReplyLine};

use crate::sample::MG_PER_LSB;
use crate::traits::{Accelerometer, ConfigError};

/// Errors a command line can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// The line did not parse
    Parse(ParseError),
    /// The line parsed but carried an unusable argument
    Config(ConfigError),
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Line-oriented front end over an [`Accelerometer`]
pub struct Console<A> {
    accel: A,
    mg_per_lsb: u8,
    last_mg: [i16; 3],
    queued: Option<ReplyLine>,
}

impl<A: Accelerometer> Console<A> {
    /// Wrap an accelerometer
    pub fn new(accel: A) -> Self {
        Self {
            accel,
            mg_per_lsb: MG_PER_LSB,
            last_mg: [0; 3],
            queued: None,
        }
    }

    /// Parse and execute one command line
    ///
    /// A line that fails performs no device action; the error says
    /// which layer rejected it.
    pub fn handle_line(&mut self, line: &str) -> Result<(), CommandError> {
        match parse_line(line)? {
            Command::Device => {
                let id = self.accel.device_id();
                self.queued = Some(device_id_line(id));
            }
            Command::Init => self.accel.init(),
            Command::Calibrate => self.accel.calibrate(),
            Command::Format { resolution, range } => {
                self.accel.set_format(resolution, range)?;
            }
            Command::Rate { code } => self.accel.set_rate(code)?,
        }
        Ok(())
    }

    /// Produce the next reply line
    ///
    /// A queued device ID line is served first. Otherwise the device is
    /// polled once: fresh data is read, converted and cached with
    /// `new_data` 1; without fresh data the previous mg values repeat
    /// with `new_data` 0.
    pub fn poll_line(&mut self) -> ReplyLine {
        if let Some(reply) = self.queued.take() {
            return reply;
        }
        let fresh = self.accel.is_data_ready();
        if fresh {
            let sample = self.accel.read_sample();
            self.last_mg = sample.to_milli_g(self.mg_per_lsb);
        }
        reading_line(fresh, self.last_mg, self.mg_per_lsb)
    }

    /// Hand the accelerometer back
    pub fn release(self) -> A {
        self.accel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::AccelSample;
    use heapless::{Deque, Vec};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        DeviceId,
        Init,
        Calibrate,
        SetFormat(u8, u16),
        SetRate(u8),
    }

    /// Recording fake: scripts data-ready answers and logs every call
    struct DummyAccel {
        calls: Vec<Call, 16>,
        ready: Deque<bool, 8>,
        sample: AccelSample,
        reject_config: bool,
    }

    impl DummyAccel {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                ready: Deque::new(),
                sample: AccelSample::default(),
                reject_config: false,
            }
        }
    }

    impl Accelerometer for DummyAccel {
        fn device_id(&mut self) -> u8 {
            let _ = self.calls.push(Call::DeviceId);
            0xE5
        }

        fn init(&mut self) {
            let _ = self.calls.push(Call::Init);
        }

        fn calibrate(&mut self) {
            let _ = self.calls.push(Call::Calibrate);
        }

        fn set_format(&mut self, resolution: u8, range: u16) -> Result<(), ConfigError> {
            if self.reject_config {
                return Err(ConfigError::Range(range));
            }
            let _ = self.calls.push(Call::SetFormat(resolution, range));
            Ok(())
        }

        fn set_rate(&mut self, code: u8) -> Result<(), ConfigError> {
            if self.reject_config {
                return Err(ConfigError::Rate(code));
            }
            let _ = self.calls.push(Call::SetRate(code));
            Ok(())
        }

        fn is_data_ready(&mut self) -> bool {
            // Script exhausted means no fresh data
            self.ready.pop_front().unwrap_or(false)
        }

        fn read_sample(&mut self) -> AccelSample {
            self.sample
        }
    }

    #[test]
    fn test_device_queues_id_line_once() {
        let mut console = Console::new(DummyAccel::new());
        console.handle_line("device").unwrap();

        assert_eq!(console.poll_line().as_str(), "e5\n");
        // Served exactly once; the next poll is a reading line again
        assert_eq!(console.poll_line().as_str(), "0 0 0 0 3\n");
    }

    #[test]
    fn test_fresh_then_stale_readings() {
        let mut fake = DummyAccel::new();
        fake.ready.push_back(true).unwrap();
        fake.sample = AccelSample { x: 16, y: 32, z: 48 };

        let mut console = Console::new(fake);
        assert_eq!(console.poll_line().as_str(), "1 48 96 144 3\n");
        // No fresh data: the previous mg values repeat with new_data 0
        assert_eq!(console.poll_line().as_str(), "0 48 96 144 3\n");
        assert_eq!(console.poll_line().as_str(), "0 48 96 144 3\n");
    }

    #[test]
    fn test_dispatch_records_device_actions() {
        let mut console = Console::new(DummyAccel::new());
        console.handle_line("init").unwrap();
        console.handle_line("calibrate").unwrap();
        console.handle_line("format 1 16").unwrap();
        console.handle_line("rate 7").unwrap();

        let accel = console.release();
        assert_eq!(
            accel.calls.as_slice(),
            &[
                Call::Init,
                Call::Calibrate,
                Call::SetFormat(1, 16),
                Call::SetRate(7),
            ]
        );
    }

    #[test]
    fn test_bad_lines_reach_no_device() {
        let mut console = Console::new(DummyAccel::new());
        assert_eq!(
            console.handle_line(""),
            Err(CommandError::Parse(ParseError::Empty))
        );
        assert_eq!(
            console.handle_line("reboot"),
            Err(CommandError::Parse(ParseError::UnknownCommand))
        );
        assert_eq!(
            console.handle_line("rate x"),
            Err(CommandError::Parse(ParseError::InvalidNumber))
        );

        assert!(console.release().calls.is_empty());
    }

    #[test]
    fn test_config_rejections_surface() {
        let mut fake = DummyAccel::new();
        fake.reject_config = true;

        let mut console = Console::new(fake);
        assert_eq!(
            console.handle_line("rate 99"),
            Err(CommandError::Config(ConfigError::Rate(99)))
        );
        assert!(console.release().calls.is_empty());
    }

    #[test]
    fn test_console_can_borrow_the_device() {
        let mut fake = DummyAccel::new();
        {
            let mut console = Console::new(&mut fake);
            console.handle_line("init").unwrap();
        }
        assert_eq!(fake.calls.as_slice(), &[Call::Init]);
    }
}
