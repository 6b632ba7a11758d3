use std::ffi::OsString;
use std::sync::{Mutex, PoisonError};

use log::{debug, info};
use rusqlite::{Connection, LoadExtensionGuard, OpenFlags};

use crate::error::{Result, SpatialError};
use crate::spatialite_sql::SQL_SPATIALITE_VERSION;
use crate::types::{DatabaseTarget, SecurityPolicy};

/// Library name SQLite resolves through the platform's loader search path.
pub const DEFAULT_EXTENSION_PATH: &str = "mod_spatialite";

// Read by SpatiaLite while it registers its SQL functions.
const SECURITY_ENV: &str = "SPATIALITE_SECURITY";

// Serializes extension loads so each one sees the security setting it asked for.
static EXTENSION_LOAD: Mutex<()> = Mutex::new(());

/// Options applied when a `SpatialDb` is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub extension_path: String,
    pub security: SecurityPolicy,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            extension_path: DEFAULT_EXTENSION_PATH.to_string(),
            security: SecurityPolicy::Strict,
        }
    }
}

/// Version string of the SQLite library linked into this binary.
pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}

/// SQLite connection with the SpatiaLite extension loaded into it.
#[derive(Debug)]
pub struct SpatialDb {
    pub(super) conn: Connection,
    target: DatabaseTarget,
}

impl SpatialDb {
    /// Open (or create) the target database and load SpatiaLite into it.
    ///
    /// A file target is opened read-write and created when absent. If the
    /// database cannot be opened nothing else is attempted; if the extension
    /// cannot be loaded the connection is closed before the error returns.
    ///
    /// SpatiaLite picks its security policy from the `SPATIALITE_SECURITY`
    /// environment variable. While the extension loads, that variable is set
    /// (`Relaxed`) or removed (`Strict`), then restored. Loads from this crate
    /// are serialized, but other threads reading the environment through C
    /// `getenv` during an open are not synchronized with it.
    pub fn open(target: &DatabaseTarget, options: &ConnectionOptions) -> Result<Self> {
        let conn = match target {
            DatabaseTarget::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            ),
            DatabaseTarget::InMemory => Connection::open_in_memory(),
        }
        .map_err(|source| SpatialError::Open {
            target: target.clone(),
            source,
        })?;
        debug!("opened database {target}");

        load_spatialite(&conn, options)?;
        info!(
            "loaded {} into {target} (security: {:?})",
            options.extension_path, options.security
        );

        Ok(Self {
            conn,
            target: target.clone(),
        })
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }

    /// Version reported by the loaded SpatiaLite extension.
    pub fn spatialite_version(&self) -> Result<String> {
        let version = self
            .conn
            .query_row(SQL_SPATIALITE_VERSION, [], |row| row.get(0))?;
        Ok(version)
    }

    /// Close the connection, releasing the extension's connection cache with it.
    ///
    /// Dropping a `SpatialDb` releases the same resources but swallows any
    /// error SQLite reports while closing.
    pub fn close(self) -> Result<()> {
        let target = self.target;
        self.conn
            .close()
            .map_err(|(_conn, err)| SpatialError::Close(err))?;
        debug!("closed database {target}");
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn load_spatialite(conn: &Connection, options: &ConnectionOptions) -> Result<()> {
    let loaded = with_security_env(options.security, || {
        // SAFETY: loading is enabled only for the duration of this call, and
        // the library is the SpatiaLite module the caller asked for.
        unsafe {
            LoadExtensionGuard::new(conn)
                .and_then(|_guard| conn.load_extension(&options.extension_path, None::<&str>))
        }
    });
    loaded.map_err(|source| SpatialError::ExtensionLoad {
        path: options.extension_path.clone(),
        source,
    })
}

/// Run `load` with `SPATIALITE_SECURITY` matching `security`, holding the
/// process-wide extension lock throughout.
fn with_security_env<T>(security: SecurityPolicy, load: impl FnOnce() -> T) -> T {
    let _lock = EXTENSION_LOAD
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    let _env = match security {
        SecurityPolicy::Relaxed => ScopedEnv::set(SECURITY_ENV, "relaxed"),
        SecurityPolicy::Strict => ScopedEnv::unset(SECURITY_ENV),
    };
    load()
}

/// Sets or removes an environment variable and restores its previous state on drop.
///
/// Only constructed under `EXTENSION_LOAD`.
struct ScopedEnv {
    name: &'static str,
    previous: Option<OsString>,
}

impl ScopedEnv {
    fn set(name: &'static str, value: &str) -> Self {
        let previous = std::env::var_os(name);
        // SAFETY: every writer in this crate holds `EXTENSION_LOAD`; the
        // remaining caveat is documented on `SpatialDb::open`.
        unsafe { std::env::set_var(name, value) };
        Self { name, previous }
    }

    fn unset(name: &'static str) -> Self {
        let previous = std::env::var_os(name);
        // SAFETY: see `ScopedEnv::set`.
        unsafe { std::env::remove_var(name) };
        Self { name, previous }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        // SAFETY: see `ScopedEnv::set`.
        unsafe {
            match &self.previous {
                Some(value) => std::env::set_var(self.name, value),
                None => std::env::remove_var(self.name),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatialite::test_support::open_in_memory;

    #[test]
    fn open_fails_for_unwritable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing").join("walkthrough.sqlite");
        let target = DatabaseTarget::File(path.clone());

        let err = SpatialDb::open(&target, &ConnectionOptions::default())
            .expect_err("missing directory should fail");
        match err {
            SpatialError::Open { target, .. } => {
                assert_eq!(target, DatabaseTarget::File(path.clone()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn open_fails_for_missing_extension() {
        let options = ConnectionOptions {
            extension_path: "/nonexistent/libnot_spatialite".to_string(),
            security: SecurityPolicy::Strict,
        };
        let err = SpatialDb::open(&DatabaseTarget::InMemory, &options)
            .expect_err("missing extension should fail");
        match err {
            SpatialError::ExtensionLoad { path, .. } => {
                assert_eq!(path, "/nonexistent/libnot_spatialite");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn lock_extension_load() -> std::sync::MutexGuard<'static, ()> {
        EXTENSION_LOAD
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn scoped_env_restores_previous_state() {
        const NAME: &str = "RUSQLITE_SPATIALITE_SCOPED_ENV_TEST";
        let _lock = lock_extension_load();
        assert!(std::env::var_os(NAME).is_none());
        {
            let _env = ScopedEnv::set(NAME, "relaxed");
            assert_eq!(std::env::var(NAME).as_deref(), Ok("relaxed"));
            {
                let _inner = ScopedEnv::unset(NAME);
                assert!(std::env::var_os(NAME).is_none());
            }
            assert_eq!(std::env::var(NAME).as_deref(), Ok("relaxed"));
        }
        assert!(std::env::var_os(NAME).is_none());
    }

    #[test]
    fn concurrent_loads_each_see_their_own_policy() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let security = if i % 2 == 0 {
                    SecurityPolicy::Relaxed
                } else {
                    SecurityPolicy::Strict
                };
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        with_security_env(security, || {
                            std::thread::yield_now();
                            let expected = match security {
                                SecurityPolicy::Relaxed => Some(OsString::from("relaxed")),
                                SecurityPolicy::Strict => None,
                            };
                            assert_eq!(std::env::var_os(SECURITY_ENV), expected);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("loader thread panicked");
        }
    }

    #[test]
    #[ignore = "requires mod_spatialite"]
    fn strict_policy_ignores_inherited_relaxed_env() -> crate::Result<()> {
        {
            let _lock = lock_extension_load();
            // SAFETY: the extension lock is held.
            unsafe { std::env::set_var(SECURITY_ENV, "relaxed") };
        }
        let opened = open_in_memory(SecurityPolicy::Strict);
        {
            let _lock = lock_extension_load();
            // SAFETY: the extension lock is held.
            unsafe { std::env::remove_var(SECURITY_ENV) };
        }
        let db = opened?;

        let err = db
            .connection()
            .query_row("SELECT ImportSHP('/nonexistent/shp', 'regions', 'UTF-8')", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .expect_err("ImportSHP should not be registered");
        assert!(err.to_string().contains("no such function"), "{err}");

        let relaxed = open_in_memory(SecurityPolicy::Relaxed)?;
        let called = relaxed.connection().query_row(
            "SELECT ImportSHP('/nonexistent/shp', 'regions', 'UTF-8')",
            [],
            |row| row.get::<_, Option<i64>>(0),
        );
        if let Err(err) = called {
            assert!(!err.to_string().contains("no such function"), "{err}");
        }
        Ok(())
    }

    #[test]
    #[ignore = "requires mod_spatialite"]
    fn reports_versions_and_closes() -> crate::Result<()> {
        let db = open_in_memory(SecurityPolicy::Strict)?;
        assert!(!sqlite_version().is_empty());
        assert!(!db.spatialite_version()?.is_empty());
        assert_eq!(db.target(), &DatabaseTarget::InMemory);
        db.close()
    }
}
