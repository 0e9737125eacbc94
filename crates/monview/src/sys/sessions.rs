use crate::config::Config;
use crate::controller::Controller;
use derive_more::Display;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const ID_BYTES: usize = 16;

/// Random token naming one browser tab's session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        let bytes: [u8; ID_BYTES] = rand::random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Accepts only ids of the shape produced by [`SessionId::generate`].
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (raw.len() == ID_BYTES * 2 && raw.bytes().all(|b| b.is_ascii_hexdigit()))
            .then(|| Self(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub struct Session {
    controller: Mutex<Controller>,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn new(config: &Config) -> Self {
        Self {
            controller: Mutex::new(Controller::new(config)),
            last_seen: Mutex::new(Instant::now()),
        }
    }

    /// Locks the session's controller and marks the session as in use.
    pub fn controller(&self) -> MutexGuard<'_, Controller> {
        *self.last_seen.lock() = Instant::now();
        self.controller.lock()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, config: &Config) -> (SessionId, Arc<Session>) {
        let session = Arc::new(Session::new(config));
        let mut sessions = self.sessions.write();
        let id = loop {
            let id = SessionId::generate();
            if !sessions.contains_key(&id) {
                break id;
            }
        };
        sessions.insert(id.clone(), session.clone());
        log::info!("Opened session {} ({} live)", id, sessions.len());
        (id, session)
    }

    pub fn get(&self, id: &SessionId) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    pub fn close(&self, id: &SessionId) -> bool {
        let closed = self.sessions.write().remove(id).is_some();
        if closed {
            log::info!("Closed session {}", id);
        }
        closed
    }

    /// Drops sessions idle for longer than `timeout`; returns how many went.
    pub fn sweep(&self, timeout: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.idle_for() <= timeout;
            if !keep {
                log::info!("Session {} timed out", id);
            }
            keep
        });
        before - sessions.len()
    }

    /// Pushes new defaults, limits and plot settings into every live session.
    pub fn reconfigure(&self, config: &Config) {
        for session in self.sessions.read().values() {
            session.controller().reconfigure(config);
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ParameterField;

    #[test]
    fn test_session_ids() {
        let id = SessionId::generate();
        assert_eq!(id.as_str().len(), 32);
        assert_eq!(SessionId::parse(id.as_str()), Some(id.clone()));
        assert_ne!(SessionId::generate(), id);
        assert_eq!(SessionId::parse("not-a-session"), None);
        assert_eq!(SessionId::parse(""), None);
        assert_eq!(SessionId::parse(&"g".repeat(32)), None);
    }

    #[test]
    fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let config = Config::default();
        let (a, first) = registry.open(&config);
        let (b, second) = registry.open(&config);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);

        {
            let mut controller = first.controller();
            let id = controller.setups()[0].id;
            controller
                .on_parameter_change(id, 0, ParameterField::Width, 80.0)
                .unwrap();
        }
        assert_eq!(first.controller().setups()[0].setup.monitors[0].width, 80.0);
        assert_ne!(second.controller().setups()[0].setup.monitors[0].width, 80.0);

        assert!(registry.close(&a));
        assert!(!registry.close(&a));
        assert!(registry.get(&a).is_none());
        assert!(registry.get(&b).is_some());
    }

    #[test]
    fn test_sweep_idle_sessions() {
        let registry = SessionRegistry::new();
        registry.open(&Config::default());
        assert_eq!(registry.sweep(Duration::from_secs(60)), 0);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(registry.sweep(Duration::from_millis(5)), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_reconfigure_reaches_live_sessions() {
        let registry = SessionRegistry::new();
        let (_, session) = registry.open(&Config::default());
        let mut config = Config::default();
        config.limits.max_setups = 2;
        registry.reconfigure(&config);
        assert_eq!(session.controller().limits().max_setups, 2);
    }
}
