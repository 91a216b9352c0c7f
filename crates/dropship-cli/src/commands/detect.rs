use std::path::Path;

pub fn detect(path: &Path, format: &str) -> anyhow::Result<()> {
    let source = super::read_source(path)?;
    let classification = dropship_detect::detect(&source);

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
        _ => {
            print!("{}", dropship_detect::report::format_report(&classification));
        }
    }

    Ok(())
}
