use std::sync::{LazyLock, Mutex};

/// Serializes every test that reads or writes `ASTERONIRIS_*` variables.
pub(super) static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Sets or clears one variable and puts the previous value back on drop.
/// Hold `ENV_LOCK` for the guard's whole lifetime.
pub(super) struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold ENV_LOCK, so no other test touches the
    // environment concurrently.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

impl EnvVarGuard {
    fn replace(key: &'static str, value: Option<&str>) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, value);
        Self { key, previous }
    }

    pub(super) fn set(key: &'static str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    pub(super) fn unset(key: &'static str) -> Self {
        Self::replace(key, None)
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        write_var(self.key, self.previous.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ASTERONIRIS_TEST_ENV_GUARD";

    #[test]
    fn nested_guards_restore_in_reverse_order() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _clean = EnvVarGuard::unset(KEY);
        {
            let _outer = EnvVarGuard::set(KEY, "outer");
            {
                let _inner = EnvVarGuard::unset(KEY);
                assert!(std::env::var(KEY).is_err());
            }
            assert_eq!(std::env::var(KEY).as_deref(), Ok("outer"));
        }
        assert!(std::env::var(KEY).is_err());
    }
}
