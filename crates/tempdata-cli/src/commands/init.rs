use std::path::Path;

use tempdata::TempDataConfig;

pub fn init(path: &str, db: &str) -> anyhow::Result<()> {
    let output = Path::new(path).join("tempdata.toml");
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }

    let config = TempDataConfig::scaffold(Path::new(db));
    std::fs::write(&output, config.to_toml_string()?)?;
    println!("✓ Generated {}", output.display());
    Ok(())
}
