//! CloudFormation template loading

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::DeployError;

/// Read the template as raw text; it is submitted unmodified.
pub(crate) fn read_template(path: &Path) -> Result<String, DeployError> {
    match fs::read_to_string(path) {
        Ok(body) => {
            tracing::debug!(path = %path.display(), bytes = body.len(), "read template");
            Ok(body)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DeployError::TemplateNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(DeployError::TemplateRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
