//! Widget server management
//!
//! Spawns the `vitrine-web` binary pointed at the widget build artifact so
//! the suite has a live script host, detects readiness with an HTTP probe,
//! and tears the process down with a graceful signal before forcing it.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{PipelineError, PipelineResult};

/// Configuration for spawning the widget host
#[derive(Debug, Clone)]
pub struct WidgetServerConfig {
    /// Path to the vitrine-web binary
    pub binary_path: PathBuf,

    /// Directory containing the widget build artifacts
    pub dist_dir: PathBuf,

    /// Port to listen on (None = find a free port)
    pub port: Option<u16>,

    /// Cap on the readiness wait; expiry is degraded, not fatal
    pub startup_timeout: Duration,
}

impl Default for WidgetServerConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("target/debug/vitrine-web"),
            dist_dir: PathBuf::from("web-components/dist/browser"),
            port: None,
            startup_timeout: Duration::from_secs(60),
        }
    }
}

/// Handle to a running widget host process
#[derive(Debug)]
pub struct WidgetServerHandle {
    child: Child,
    pub base_url: String,
    pub port: u16,
}

impl WidgetServerHandle {
    /// Spawn the widget host. Returns `Ok(None)` when the artifact
    /// directory does not exist: the pipeline proceeds without a widget.
    pub async fn spawn(config: WidgetServerConfig) -> PipelineResult<Option<Self>> {
        if !config.dist_dir.is_dir() {
            info!(
                "Widget dist {} not found; skipping widget server",
                config.dist_dir.display()
            );
            return Ok(None);
        }

        let port = config.port.unwrap_or_else(find_free_port);
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning widget server on port {}", port);

        let mut cmd = Command::new(&config.binary_path);
        cmd.env("VITRINE_WEB_ADDR", format!("127.0.0.1:{}", port))
            .env("VITRINE_WIDGET_DIST", &config.dist_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().map_err(|e| {
            PipelineError::ServerStartup(format!(
                "Failed to spawn {}: {}",
                config.binary_path.display(),
                e
            ))
        })?;

        let handle = WidgetServerHandle {
            child,
            base_url: base_url.clone(),
            port,
        };

        if handle.wait_for_ready(config.startup_timeout).await {
            info!("Widget server is ready at {}", base_url);
        } else {
            warn!("Widget server did not become ready in time. Continuing anyway...");
        }

        Ok(Some(handle))
    }

    /// Poll the server root until it answers, bounded by `timeout_duration`
    async fn wait_for_ready(&self, timeout_duration: Duration) -> bool {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
        {
            Ok(client) => client,
            Err(_) => return false,
        };

        let probe_url = format!("{}/", self.base_url);
        let start = std::time::Instant::now();
        let mut attempts = 0u32;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            match client.get(&probe_url).send().await {
                Ok(resp) if resp.status().is_success() => return true,
                Ok(resp) => {
                    warn!("Readiness probe returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for widget server to start...");
                    }
                    // Connection refused is expected while the server boots
                    if !e.is_connect() {
                        warn!("Readiness probe error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        false
    }

    /// Stop the server: SIGTERM, a bounded grace wait, then SIGKILL
    pub fn stop(&mut self) {
        info!("Stopping widget server (pid: {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                let grace = Duration::from_secs(5);
                let start = std::time::Instant::now();
                while start.elapsed() < grace {
                    match self.child.try_wait() {
                        Ok(Some(_)) => return,
                        Ok(None) => std::thread::sleep(Duration::from_millis(100)),
                        Err(_) => break,
                    }
                }
            }
        }

        // Still alive after the grace period
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for WidgetServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Find a free port to use
fn find_free_port() -> u16 {
    use std::net::TcpListener;

    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to find free port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}
