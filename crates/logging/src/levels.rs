//! Flag enums and level structures for info and debug verbosity.

/// Info flags for user-facing diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InfoFlag {
    /// Session outcome lines.
    Session,
    /// Byte and probe counters.
    Stats,
}

/// Debug flags for developer diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DebugFlag {
    /// Name resolution and TCP connection establishment.
    Connect,
    /// TLS configuration, trust decisions and handshakes.
    Tls,
    /// Response protocol steps.
    Proto,
    /// Individual reads and writes.
    Io,
    /// Exit status and channel release.
    Exit,
}

/// Info verbosity levels for each flag.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct InfoLevels {
    /// Session outcome level.
    pub session: u8,
    /// Counter level.
    pub stats: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Session => self.session,
            InfoFlag::Stats => self.stats,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Session => self.session = level,
            InfoFlag::Stats => self.stats = level,
        }
    }

    /// Set all flags to the specified level.
    pub const fn set_all(&mut self, level: u8) {
        self.session = level;
        self.stats = level;
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct DebugLevels {
    /// Connection establishment level.
    pub connect: u8,
    /// TLS level.
    pub tls: u8,
    /// Response protocol level.
    pub proto: u8,
    /// Read/write level.
    pub io: u8,
    /// Exit and release level.
    pub exit: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Connect => self.connect,
            DebugFlag::Tls => self.tls,
            DebugFlag::Proto => self.proto,
            DebugFlag::Io => self.io,
            DebugFlag::Exit => self.exit,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Connect => self.connect = level,
            DebugFlag::Tls => self.tls = level,
            DebugFlag::Proto => self.proto = level,
            DebugFlag::Io => self.io = level,
            DebugFlag::Exit => self.exit = level,
        }
    }

    /// Set all flags to the specified level.
    pub const fn set_all(&mut self, level: u8) {
        self.connect = level;
        self.tls = level;
        self.proto = level;
        self.io = level;
        self.exit = level;
    }
}
