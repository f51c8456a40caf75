//! PDF rendering seam. The enhanced resume JSON is serialized to YAML and
//! compiled by the external `typst` binary against a bundled template.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;
use tracing::info;
use uuid::Uuid;

const TYPST_BIN: &str = "typst";
const TYPST_ENTRY: &str = "example.typ";
const CONFIG_FILE: &str = "configuration.yaml";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("typst template {} not found in {}", .0, .1.display())]
    MissingTemplate(&'static str, PathBuf),

    #[error("failed to serialize resume to YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("typst is not installed or not in PATH; install it from https://github.com/typst/typst")]
    TypstNotInstalled,

    #[error("typst compilation failed: {0}")]
    Compile(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Turns a final resume document into a PDF on disk.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, document: &Value) -> Result<PathBuf, RenderError>;
}

/// Renders via the `typst` CLI. Each render stages the template directory
/// into a transient work directory next to the output, drops the resume in
/// as `configuration.yaml`, and compiles the template entry point.
pub struct TypstRenderer {
    template_dir: PathBuf,
    output_dir: PathBuf,
}

impl TypstRenderer {
    pub fn new(template_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl Renderer for TypstRenderer {
    async fn render(&self, document: &Value) -> Result<PathBuf, RenderError> {
        let entry = self.template_dir.join(TYPST_ENTRY);
        if !entry.exists() {
            return Err(RenderError::MissingTemplate(
                TYPST_ENTRY,
                self.template_dir.clone(),
            ));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let output_dir = self.output_dir.canonicalize()?;

        let work_dir = tempfile::Builder::new()
            .prefix("typst_work_")
            .tempdir_in(&output_dir)?;
        copy_dir_contents(&self.template_dir, work_dir.path())?;

        let config_yaml = serde_yaml::to_string(document)?;
        std::fs::write(work_dir.path().join(CONFIG_FILE), config_yaml)?;

        // typst resolves template imports and the configuration file against
        // its working directory, so compilation runs inside the staged copy
        // and the output path must be absolute.
        let output_path = output_dir.join(format!("{}_resume.pdf", Uuid::new_v4()));
        let output = match Command::new(TYPST_BIN)
            .arg("compile")
            .arg(TYPST_ENTRY)
            .arg(&output_path)
            .current_dir(work_dir.path())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RenderError::TypstNotInstalled)
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        if !output.status.success() {
            return Err(RenderError::Compile(
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        info!("Resume PDF generated at {}", output_path.display());
        Ok(output_path)
    }
}

fn copy_dir_contents(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_dir_contents(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_copy_dir_contents_recurses() {
        let src = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("example.typ"), "#import \"lib.typ\"").unwrap();
        std::fs::create_dir(src.path().join("assets")).unwrap();
        std::fs::write(src.path().join("assets").join("font.ttf"), b"glyphs").unwrap();

        let dst = tempfile::tempdir().unwrap();
        copy_dir_contents(src.path(), dst.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(dst.path().join("example.typ")).unwrap(),
            "#import \"lib.typ\""
        );
        assert_eq!(
            std::fs::read(dst.path().join("assets").join("font.ttf")).unwrap(),
            b"glyphs"
        );
    }

    #[tokio::test]
    async fn test_render_missing_template() {
        let output = tempfile::tempdir().unwrap();
        let renderer = TypstRenderer::new("/nonexistent/templates", output.path());
        let err = renderer.render(&json!({"basics": {}})).await.unwrap_err();
        assert!(matches!(err, RenderError::MissingTemplate("example.typ", _)));
        assert!(err.to_string().contains("example.typ"));
    }

    #[test]
    fn test_document_survives_yaml_serialization() {
        let document = json!({
            "basics": {"name": "Ada Lovelace", "summary": "First programmer"},
            "work": [{"name": "Analytical Engine", "highlights": ["wrote Note G"]}]
        });
        let yaml = serde_yaml::to_string(&document).unwrap();
        let round_tripped: Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(round_tripped, document);
    }
}
