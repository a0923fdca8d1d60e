//! Verbosity configuration combining info and debug levels.

use tracing::level_filters::LevelFilter;

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a configuration from a `-v` count.
    ///
    /// Level 0 keeps only warnings. Each further `-v` opens one more layer:
    /// session outcomes and connection steps, then protocol steps, then
    /// every individual read and write.
    pub const fn from_verbose_level(level: u8) -> Self {
        let mut config = Self {
            info: InfoLevels {
                session: 0,
                stats: 0,
            },
            debug: DebugLevels {
                connect: 0,
                tls: 0,
                proto: 0,
                io: 0,
                exit: 0,
            },
        };

        match level {
            0 => {}
            1 => {
                config.info.session = 1;
                config.info.stats = 1;
                config.debug.connect = 1;
                config.debug.tls = 1;
            }
            2 => {
                config.info.session = 1;
                config.info.stats = 1;
                config.debug.connect = 2;
                config.debug.tls = 2;
                config.debug.proto = 2;
                config.debug.exit = 2;
            }
            _ => {
                config.info.set_all(1);
                config.debug.set_all(3);
            }
        }

        config
    }

    /// Apply a single info flag token (e.g., "stats", "session2").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        let flag = match name {
            "session" => InfoFlag::Session,
            "stats" => InfoFlag::Stats,
            _ => return Err(format!("unknown info flag: {name}")),
        };

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "io3", "tls").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        let flag = match name {
            "connect" => DebugFlag::Connect,
            "tls" => DebugFlag::Tls,
            "proto" => DebugFlag::Proto,
            "io" => DebugFlag::Io,
            "exit" => DebugFlag::Exit,
            _ => return Err(format!("unknown debug flag: {name}")),
        };

        self.debug.set(flag, level);
        Ok(())
    }

    /// Most verbose tracing level any flag admits; warnings always pass.
    pub const fn max_level(&self) -> LevelFilter {
        let mut highest = self.info.session;
        let candidates = [
            self.info.stats,
            self.debug.connect,
            self.debug.tls,
            self.debug.proto,
            self.debug.io,
            self.debug.exit,
        ];
        let mut index = 0;
        while index < candidates.len() {
            if candidates[index] > highest {
                highest = candidates[index];
            }
            index += 1;
        }

        match highest {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// Parse a flag token like "io3" into ("io", 3) or "tls" into ("tls", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_owned());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(pos) => {
            let (name, level) = token.split_at(pos);
            let level = level
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}
