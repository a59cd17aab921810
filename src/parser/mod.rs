use crate::error::{Form2ListError, Form2ListResult};
use crate::types::Config;
use serde_yaml::Value;
use std::path::Path;

/// Load a conversion config (`spec.yml`) from disk.
///
/// The document is parsed twice: first as plain YAML, so syntax errors surface
/// as [`Form2ListError::Yaml`], then into [`Config`], so structural problems
/// (a missing `template`, a sheet without `columns`, a column without `value`)
/// surface as [`Form2ListError::ConfigMalformed`] naming the offending key.
///
/// Relative `template` and `output` paths are resolved against the directory
/// holding the config file.
///
/// # Example
/// ```no_run
/// use form2list::parser::parse_config;
/// use std::path::Path;
///
/// let config = parse_config(Path::new("spec.yml"))?;
/// println!("Formats: {}", config.input_formats.len());
/// # Ok::<(), form2list::error::Form2ListError>(())
/// ```
pub fn parse_config(path: &Path) -> Form2ListResult<Config> {
    if !path.is_file() {
        return Err(Form2ListError::ConfigNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_config_str(&content, base_dir)
}

/// Parse a config document held in memory; relative paths are joined to `base_dir`
pub fn parse_config_str(content: &str, base_dir: &Path) -> Form2ListResult<Config> {
    let yaml: Value = serde_yaml::from_str(content)?;
    if !yaml.is_mapping() {
        return Err(Form2ListError::ConfigMalformed(
            "top level must be a mapping with a 'template' key".to_string(),
        ));
    }

    let mut config: Config = serde_yaml::from_str(content)
        .map_err(|e| Form2ListError::ConfigMalformed(e.to_string()))?;

    if config.template.is_relative() {
        config.template = base_dir.join(&config.template);
    }
    if let Some(output) = config.output.as_mut() {
        if output.is_relative() {
            *output = base_dir.join(&*output);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_minimal_config() {
        let yaml = r#"
template: list.xlsx
inputFormats:
  - items:
      name: B2
sheets:
  - name: List
    columns:
      - value: "{{ name }}"
"#;
        let config = parse_config_str(yaml, Path::new("conf")).unwrap();
        assert_eq!(config.template, PathBuf::from("conf/list.xlsx"));
        assert_eq!(config.input_formats[0].condition, "True");
        assert_eq!(config.sheets[0].columns[0].value, "{{ name }}");
    }

    #[test]
    fn test_absolute_template_untouched() {
        let yaml = "template: /data/list.xlsx\noutput: out/result.xlsx\n";
        let config = parse_config_str(yaml, Path::new("conf")).unwrap();
        assert_eq!(config.template, PathBuf::from("/data/list.xlsx"));
        assert_eq!(config.output, Some(PathBuf::from("conf/out/result.xlsx")));
    }

    #[test]
    fn test_missing_template_key() {
        let err = parse_config_str("sheets: []\n", Path::new("")).unwrap_err();
        match err {
            Form2ListError::ConfigMalformed(msg) => assert!(msg.contains("template"), "{msg}"),
            other => panic!("Expected ConfigMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_columns_key() {
        let yaml = "template: t.xlsx\nsheets:\n  - name: List\n";
        let err = parse_config_str(yaml, Path::new("")).unwrap_err();
        match err {
            Form2ListError::ConfigMalformed(msg) => assert!(msg.contains("columns"), "{msg}"),
            other => panic!("Expected ConfigMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_value() {
        let yaml = "template: t.xlsx\nsheets:\n  - name: List\n    columns:\n      - {}\n";
        let err = parse_config_str(yaml, Path::new("")).unwrap_err();
        match err {
            Form2ListError::ConfigMalformed(msg) => assert!(msg.contains("value"), "{msg}"),
            other => panic!("Expected ConfigMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_items_key() {
        let yaml = "template: t.xlsx\ninputFormats:\n  - condition: 'True'\n";
        let err = parse_config_str(yaml, Path::new("")).unwrap_err();
        assert!(matches!(err, Form2ListError::ConfigMalformed(ref m) if m.contains("items")));
    }

    #[test]
    fn test_syntax_error_is_yaml_error() {
        let err = parse_config_str("template: [unclosed\n", Path::new("")).unwrap_err();
        assert!(matches!(err, Form2ListError::Yaml(_)));
    }

    #[test]
    fn test_scalar_document_rejected() {
        let err = parse_config_str("just a string\n", Path::new("")).unwrap_err();
        assert!(matches!(err, Form2ListError::ConfigMalformed(_)));
    }

    #[test]
    fn test_config_not_found() {
        let err = parse_config(Path::new("/nonexistent/spec.yml")).unwrap_err();
        assert!(matches!(err, Form2ListError::ConfigNotFound(_)));
    }
}
