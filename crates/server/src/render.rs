#![forbid(unsafe_code)]

//! The graphviz collaborator. Rendering failures are data, not fatal errors:
//! callers show the diagnostics next to the source that failed.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderFormat {
    Svg,
    Png,
}

impl RenderFormat {
    pub fn dot_flag(self) -> &'static str {
        match self {
            Self::Svg => "-Tsvg",
            Self::Png => "-Tpng",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to spawn renderer `{bin}`: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("renderer i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("renderer exited with {status}: {diagnostics}")]
    Failed { status: String, diagnostics: String },
    #[error("renderer produced no output")]
    EmptyOutput,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, source: &str, format: RenderFormat) -> Result<Vec<u8>, RenderError>;
}

/// Pipes dot source through the graphviz CLI.
#[derive(Clone, Debug)]
pub struct GraphvizRenderer {
    bin: String,
}

impl GraphvizRenderer {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }
}

#[async_trait]
impl Renderer for GraphvizRenderer {
    async fn render(&self, source: &str, format: RenderFormat) -> Result<Vec<u8>, RenderError> {
        // Dropping the future (client went away) kills the child.
        let mut child = Command::new(&self.bin)
            .arg(format.dot_flag())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RenderError::Spawn {
                bin: self.bin.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(source.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(RenderError::Failed {
                status: output.status.to_string(),
                diagnostics,
            });
        }
        fed?;
        if !diagnostics.is_empty() {
            tracing::warn!(bin = %self.bin, %diagnostics, "renderer reported warnings");
        }
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let renderer = GraphvizRenderer::new("/nonexistent/bubbles-dot");
        let err = renderer
            .render("digraph G {}\n", RenderFormat::Svg)
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/bubbles-dot"));
    }

    #[test]
    fn formats_map_to_dot_flags() {
        assert_eq!(RenderFormat::Svg.dot_flag(), "-Tsvg");
        assert_eq!(RenderFormat::Png.dot_flag(), "-Tpng");
        assert_eq!(RenderFormat::Png.content_type(), "image/png");
    }
}
