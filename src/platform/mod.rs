//! Platform Adapter
//!
//! Maps the runtime platform to the preparation path the database
//! engine needs before first use. Android asks for storage permissions,
//! web initializes the backing store, everything else starts clean.

use crate::engine::{EngineError, SqliteEngine};
use std::fmt;
use tracing::{debug, info, warn};

/// Platform the provisioning flow runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Web,
    Desktop,
}

impl Platform {
    /// Detect the platform from the compile target
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Desktop
        }
    }

    pub fn is_web(&self) -> bool {
        *self == Platform::Web
    }

    pub fn is_ios(&self) -> bool {
        *self == Platform::Ios
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Web => "web",
            Platform::Desktop => "desktop",
        };
        write!(f, "{}", name)
    }
}

/// Run the platform-specific preparation before any database operation.
///
/// A failed Android permission request is logged and swallowed; the
/// first real database operation surfaces the problem if it persists.
/// A failed web store initialization propagates, since no database can
/// exist without the backing store.
pub async fn prepare<E: SqliteEngine>(platform: Platform, engine: &E) -> Result<(), EngineError> {
    match platform {
        Platform::Android => {
            info!("Requesting storage permissions");
            if let Err(e) = engine.request_permissions().await {
                warn!("Storage permission request failed, continuing: {}", e);
            }
            Ok(())
        }
        Platform::Web => {
            info!("Initializing web store");
            engine.init_web_store().await
        }
        Platform::Ios | Platform::Desktop => {
            debug!("No preparation needed on {}", platform);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct ProbeEngine {
        calls: Mutex<Vec<&'static str>>,
        fail_permissions: bool,
        fail_web_store: bool,
    }

    impl ProbeEngine {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl SqliteEngine for ProbeEngine {
        async fn request_permissions(&self) -> Result<(), EngineError> {
            self.calls.lock().push("request_permissions");
            if self.fail_permissions {
                return Err(EngineError::Unwritable {
                    path: "/denied".into(),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                });
            }
            Ok(())
        }

        async fn init_web_store(&self) -> Result<(), EngineError> {
            self.calls.lock().push("init_web_store");
            if self.fail_web_store {
                return Err(EngineError::WebStoreUnsupported);
            }
            Ok(())
        }

        async fn create_connection(&self, _database: &str) -> Result<(), EngineError> {
            self.calls.lock().push("create_connection");
            Ok(())
        }

        async fn open(&self, _database: &str) -> Result<(), EngineError> {
            self.calls.lock().push("open");
            Ok(())
        }

        async fn execute(&self, _database: &str, _statement: &str) -> Result<(), EngineError> {
            self.calls.lock().push("execute");
            Ok(())
        }

        async fn close_connection(&self, _database: &str) -> Result<(), EngineError> {
            self.calls.lock().push("close_connection");
            Ok(())
        }
    }

    #[test]
    fn test_detect_on_desktop_targets() {
        #[cfg(not(any(target_os = "android", target_os = "ios", target_arch = "wasm32")))]
        assert_eq!(Platform::detect(), Platform::Desktop);
    }

    #[test]
    fn test_platform_predicates() {
        assert!(Platform::Web.is_web());
        assert!(!Platform::Web.is_ios());
        assert!(Platform::Ios.is_ios());
        assert!(!Platform::Desktop.is_web());
    }

    #[tokio::test]
    async fn test_android_permission_failure_is_not_fatal() {
        let engine = ProbeEngine {
            fail_permissions: true,
            ..Default::default()
        };

        prepare(Platform::Android, &engine).await.unwrap();
        assert_eq!(engine.calls(), vec!["request_permissions"]);
    }

    #[tokio::test]
    async fn test_web_store_failure_propagates() {
        let engine = ProbeEngine {
            fail_web_store: true,
            ..Default::default()
        };

        let err = prepare(Platform::Web, &engine).await.unwrap_err();
        assert!(matches!(err, EngineError::WebStoreUnsupported));
    }

    #[tokio::test]
    async fn test_desktop_and_ios_prepare_touch_nothing() {
        let engine = ProbeEngine::default();

        prepare(Platform::Desktop, &engine).await.unwrap();
        prepare(Platform::Ios, &engine).await.unwrap();
        assert!(engine.calls().is_empty());
    }
}
