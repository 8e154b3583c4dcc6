use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::debug;
use miette::{NamedSource, SourceSpan};

use super::DiagramDefinition;
use crate::constants::definitions::FILE_PATTERN;
use crate::error::{DefinitionError, DefinitionParseError};

/// Definitions shipped with the binary, as (file name, contents)
const BUILTIN: &[(&str, &str)] = &[
    ("use_cases.toml", include_str!("../../diagrams/use_cases.toml")),
    ("classes.toml", include_str!("../../diagrams/classes.toml")),
    ("deployment.toml", include_str!("../../diagrams/deployment.toml")),
    ("packages.toml", include_str!("../../diagrams/packages.toml")),
];

/// Parse one TOML definition; `file` is only used in diagnostics
pub fn parse_definition(source: &str, file: &str) -> Result<DiagramDefinition, DefinitionError> {
    toml::from_str(source).map_err(|source_err| {
        let span = source_err.span().map(SourceSpan::from);
        DefinitionError::Parse(Box::new(DefinitionParseError {
            file: file.to_string(),
            source_code: NamedSource::new(file, source.to_string()),
            span,
            source: source_err,
        }))
    })
}

/// The four architecture views bundled with the crate
pub fn builtin_definitions() -> Result<Vec<DiagramDefinition>, DefinitionError> {
    let mut origins = HashMap::new();
    BUILTIN
        .iter()
        .map(|(file, source)| {
            let definition = parse_definition(source, file)?;
            register(&mut origins, &definition, file)?;
            Ok(definition)
        })
        .collect()
}

/// Load definitions from files and directories.
///
/// Directories are searched for `*.toml` (non-recursive) in sorted order.
/// Diagram names must be unique across everything loaded.
pub fn load_definitions(paths: &[PathBuf]) -> Result<Vec<DiagramDefinition>, DefinitionError> {
    let mut origins = HashMap::new();
    let mut definitions = Vec::new();

    for file in definition_files(paths)? {
        debug!(path:% = file.display(); "Loading diagram definition");

        let source = fs::read_to_string(&file).map_err(|source| DefinitionError::Read {
            path: file.clone(),
            source,
        })?;
        let display = file.display().to_string();
        let definition = parse_definition(&source, &display)?;
        register(&mut origins, &definition, &display)?;
        definitions.push(definition);
    }

    Ok(definitions)
}

/// Keep only the named diagrams, in the order requested.
///
/// An empty selection keeps everything.
pub fn select_definitions(
    definitions: Vec<DiagramDefinition>,
    names: &[String],
) -> Result<Vec<DiagramDefinition>, DefinitionError> {
    if names.is_empty() {
        return Ok(definitions);
    }

    names
        .iter()
        .map(|name| {
            definitions
                .iter()
                .find(|definition| definition.name == *name)
                .cloned()
                .ok_or_else(|| DefinitionError::NotFound {
                    name: name.clone(),
                    available: definitions
                        .iter()
                        .map(|definition| definition.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        })
        .collect()
}

fn definition_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, DefinitionError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let pattern = path.join(FILE_PATTERN);
            let pattern = pattern.to_string_lossy();
            let mut found = glob::glob(&pattern)
                .map_err(|source| DefinitionError::Pattern {
                    pattern: pattern.to_string(),
                    source,
                })?
                .collect::<Result<Vec<_>, _>>()?;
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn register(
    origins: &mut HashMap<String, String>,
    definition: &DiagramDefinition,
    file: &str,
) -> Result<(), DefinitionError> {
    if let Some(first) = origins.insert(definition.name.clone(), file.to_string()) {
        return Err(DefinitionError::DuplicateName {
            name: definition.name.clone(),
            first,
            second: file.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_definitions_parse_and_build() {
        let definitions = builtin_definitions().unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["use-cases", "classes", "deployment", "packages"]);

        for definition in &definitions {
            let graph = definition.build().unwrap();
            graph.validate().unwrap();
        }
    }

    #[test]
    fn test_parse_error_carries_span() {
        let err = parse_definition("name = \"x\"\nnodes = 3\n", "bad.toml").unwrap_err();
        match err {
            DefinitionError::Parse(parse) => {
                assert_eq!(parse.file, "bad.toml");
                assert!(parse.span.is_some());
            }
            other => panic!("Expected Parse variant, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_definition("name = \"x\"\ncolour = \"red\"\n", "bad.toml").is_err());
    }

    #[test]
    fn test_load_directory_sorted_and_deduplicated() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("b.toml"), "name = \"second\"\n").unwrap();
        fs::write(temp.path().join("a.toml"), "name = \"first\"\n").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let definitions = load_definitions(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);

        fs::write(temp.path().join("c.toml"), "name = \"first\"\n").unwrap();
        assert!(matches!(
            load_definitions(&[temp.path().to_path_buf()]),
            Err(DefinitionError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = load_definitions(&[PathBuf::from("/nonexistent/diagram.toml")]).unwrap_err();
        assert!(matches!(err, DefinitionError::Read { .. }));
    }

    #[test]
    fn test_select_definitions() {
        let definitions = builtin_definitions().unwrap();

        let selected =
            select_definitions(definitions.clone(), &["packages".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "packages");

        assert_eq!(select_definitions(definitions.clone(), &[]).unwrap().len(), 4);

        let err = select_definitions(definitions, &["sequence".to_string()]).unwrap_err();
        assert!(matches!(err, DefinitionError::NotFound { .. }));
    }
}
