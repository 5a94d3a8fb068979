//! Test utilities for the bastion crate.
//!
//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and under the `test-support` feature.

pub use clock::MutableClock;

pub mod uploads {
    //! Seed an uploads directory the same way the file store reads it:
    //! through a `cap_std` handle rooted at the directory.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Write `contents` to `relative` under `root`, creating parent
    /// directories inside `root` as needed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bastion::test_support::uploads::seed_upload;
    ///
    /// let root = tempfile::tempdir()?;
    /// seed_upload(root.path(), "reports/q1.txt", b"figures")?;
    /// assert!(root.path().join("reports/q1.txt").is_file());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn seed_upload(root: &Path, relative: &str, contents: &[u8]) -> io::Result<()> {
        let root = Dir::open_ambient_dir(root, ambient_authority())?;
        let relative = Path::new(relative);
        if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
            root.create_dir_all(parent)?;
        }
        root.write(relative, contents)
    }
}

pub mod openapi {
    //! Navigate generated OpenAPI documents in assertions.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// The inline object behind `schema`; panics naming `name` otherwise.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(object)) => object,
            RefOr::Ref(reference) => {
                panic!("{name} is a reference to {}", reference.ref_location)
            }
            _ => panic!("{name} is not an inline object schema"),
        }
    }

    /// Property `field` of `object`; panics when it is absent.
    pub fn get_property<'a>(object: &'a Object, field: &str) -> &'a RefOr<Schema> {
        object
            .properties
            .get(field)
            .unwrap_or_else(|| panic!("schema has no property {field}"))
    }
}

pub mod clock {
    //! Controllable clock for throttling, token expiry and timestamp tests.

    use std::sync::{Mutex, MutexGuard, PoisonError};
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock that only moves when a test advances it.
    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: Duration) {
            let delta = match TimeDelta::from_std(delta) {
                Ok(delta) => delta,
                Err(error) => panic!("duration out of range: {error}; delta={delta:?}"),
            };
            *self.lock_clock() += delta;
        }

        fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock_clock()
        }
    }
}

pub mod app {
    //! Assemble the full application over real adapters for integration
    //! tests.

    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::cookie::{Key, SameSite};
    use actix_web::web;
    use chrono::TimeDelta;
    use mockable::DefaultClock;

    use crate::domain::{FetchPolicy, RedirectPolicy};
    use crate::inbound::http::health::HealthState;
    use crate::server::{AppDependencies, ServiceSettings, Services, build_services};

    /// Origin accepted by the CORS layer in tests.
    pub const TEST_ORIGIN: &str = "https://shop.example";
    /// Host accepted by the fetch and redirect allow-lists in tests.
    pub const TRUSTED_HOST: &str = "trusted.example";

    /// Settings confined to `uploads_dir`, with a ping program that echoes
    /// its arguments instead of sending packets.
    pub fn service_settings(uploads_dir: &Path) -> ServiceSettings {
        ServiceSettings {
            uploads_dir: uploads_dir.to_path_buf(),
            fetch_policy: FetchPolicy::new([TRUSTED_HOST], false),
            redirect_policy: RedirectPolicy::new([TRUSTED_HOST]),
            ping_program: "echo".to_owned(),
            ping_timeout: Duration::from_secs(5),
            fetch_timeout: Duration::from_secs(5),
            token_ttl: TimeDelta::minutes(60),
        }
    }

    /// Build services over a fresh in-memory database.
    pub fn services(uploads_dir: &Path) -> Services {
        match build_services(
            service_settings(uploads_dir),
            &[7_u8; 32],
            Arc::new(DefaultClock),
        ) {
            Ok(services) => services,
            Err(error) => panic!("services should build: {error}"),
        }
    }

    /// Wrap prepared services in the dependencies `build_app` expects.
    pub fn dependencies(services: Services) -> AppDependencies {
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: web::Data::new(services.http_state),
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Strict,
            cors_origins: vec![TEST_ORIGIN.to_owned()],
        }
    }
}
