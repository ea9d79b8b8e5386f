/// Debounce and ordering bookkeeping for the bird view.
///
/// The host owns the actual timer. Each mutation hands out a fresh token;
/// only the newest token may trigger a render, which is the same as restarting
/// the timer. Render responses are applied only if their sequence number is
/// newer than the last one applied.
#[derive(Clone, Debug)]
pub struct MinimapSync {
    delay_ms: u32,
    token: u64,
    armed: bool,
    last_applied: u64,
}

impl Default for MinimapSync {
    fn default() -> Self { Self::new(120) }
}

impl MinimapSync {
    pub fn new(delay_ms: u32) -> MinimapSync {
        MinimapSync { delay_ms, token: 0, armed: false, last_applied: 0 }
    }

    pub fn delay_ms(&self) -> u32 { self.delay_ms }
    pub fn set_delay_ms(&mut self, ms: u32) { self.delay_ms = ms; }
    pub fn is_armed(&self) -> bool { self.armed }
    pub fn last_applied(&self) -> u64 { self.last_applied }

    /// Restart the debounce window. Returns the token to schedule.
    pub fn touch(&mut self) -> u64 {
        self.token = self.token.wrapping_add(1);
        self.armed = true;
        self.token
    }

    /// The host's timer for `token` fired. True when a render is due.
    pub fn fire(&mut self, token: u64) -> bool {
        if !self.armed || token != self.token {
            return false;
        }
        self.armed = false;
        true
    }

    /// Whether a response for `seq` may replace the minimap; records it if so.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.last_applied {
            return false;
        }
        self.last_applied = seq;
        true
    }

    /// Treat every response numbered `seq` or lower as stale.
    pub fn supersede(&mut self, seq: u64) { self.last_applied = self.last_applied.max(seq); }
}
