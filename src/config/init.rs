// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Creates nodelink.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let yaml = generate_template_yaml(&Config::template());
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    let release = &config.teardown.release;
    format!(
        r#"# Mode used when creating a link without --mode (AUTO, DHCP, STATIC, LINK_UP)
default_mode: {}

teardown:
  # Recorded on the machine when an in-progress operation is aborted.
  # Placeholders: {{system_id}}, {{host}}
  abort_message: "{}"
  release:
    comment: "{}"
    # erase: false
    # secure_erase: false
    # quick_erase: false
    force: {}
"#,
        config.default_mode,
        config.teardown.abort_message,
        release.comment.as_deref().unwrap_or_default(),
        release.force,
    )
}
