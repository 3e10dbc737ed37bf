//! Output assembly and file writing for generated modules.
//!
//! This module drives a generation run: every type definition is rendered
//! into its module text, the text is passed through the formatter, and the
//! finished set is written to the output directory.
//!
//! ## Output Structure
//!
//! ```text
//! pybotgram/types/
//! ├── __init__.py          # imports every class and lists it in __all__
//! ├── animation.py         # one module per schema type
//! ├── inline_query_result.py
//! └── ...
//! ```
//!
//! ## Safety Guarantees
//!
//! - **All-or-nothing**: every file is rendered and formatted in memory
//!   before the first write, so a formatter rejection leaves the output
//!   directory untouched
//! - **Atomic writes**: each file goes through a temp file + rename, and its
//!   handle is released before the next file is written

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{GeneratorConfig, RenderOptions, WARNING_BANNER};
use crate::docstring::render_docstring;
use crate::errors::GeneratorError;
use crate::fields::render_fields;
use crate::format::SourceFormatter;
use crate::imports::ImportBlock;
use crate::naming::NamingExceptions;
use crate::resolve::resolve_fields;
use crate::schema::{TypeCollection, TypeDefinition, load_schema};
use crate::template::{INDEX_TEMPLATE, TYPE_TEMPLATE, Template};

/// File name of the package index.
pub const INDEX_FILE: &str = "__init__.py";

/// A finished output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub file_name: String,
    pub contents: String,
}

/// The two templates a run needs.
#[derive(Debug, Clone)]
pub struct Templates {
    pub types: Template,
    pub index: Template,
}

impl Templates {
    /// Loads `types.txt` and `init.txt` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, GeneratorError> {
        Ok(Self {
            types: Template::load(dir, TYPE_TEMPLATE)?,
            index: Template::load(dir, INDEX_TEMPLATE)?,
        })
    }
}

/// Renders the unformatted module text for one type.
///
/// ## Errors
///
/// Returns `GeneratorError::Template` if the template lacks a value for one
/// of its slots.
pub fn render_type_module(
    def: &TypeDefinition,
    template: &Template,
    options: &RenderOptions,
) -> Result<String, GeneratorError> {
    let resolved = resolve_fields(&def.fields, &options.package);
    let imports = ImportBlock::for_type(&def.name, &resolved, &options.package);
    let docstring = render_docstring(&def.description, &resolved, options);
    let fields = render_fields(&resolved);

    template.render(&[
        ("warning", WARNING_BANNER),
        ("std_imports", &imports.typing_import),
        ("imports", &imports.deferred_imports),
        ("class_name", &def.name),
        ("docstring", &docstring),
        ("fields", &fields),
    ])
}

/// Renders the unformatted package index.
///
/// `entries` pairs each module's file identifier with its class name, in
/// emission order.
pub fn render_index(
    entries: &[(String, String)],
    template: &Template,
) -> Result<String, GeneratorError> {
    let classes = entries
        .iter()
        .map(|(_, class_name)| format!("\"{class_name}\""))
        .collect::<Vec<_>>()
        .join(",\n    ");
    let imports: String = entries
        .iter()
        .map(|(file_name, class_name)| format!("from .{file_name} import {class_name}\n"))
        .collect();

    template.render(&[
        ("warning", WARNING_BANNER),
        ("classes", &classes),
        ("imports", &imports),
    ])
}

/// Drives rendering and formatting for a whole collection.
pub struct Generator<'a> {
    collection: &'a TypeCollection,
    templates: &'a Templates,
    formatter: &'a dyn SourceFormatter,
    options: RenderOptions,
    naming: NamingExceptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        collection: &'a TypeCollection,
        templates: &'a Templates,
        formatter: &'a dyn SourceFormatter,
    ) -> Self {
        Self {
            collection,
            templates,
            formatter,
            options: RenderOptions::default(),
            naming: NamingExceptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_naming(mut self, naming: NamingExceptions) -> Self {
        self.naming = naming;
        self
    }

    /// Renders and formats every module plus the index, in schema order.
    ///
    /// Nothing is written to disk.
    ///
    /// ## Errors
    ///
    /// - `GeneratorError::Validation` if two types map to the same file name
    /// - `GeneratorError::Template` if a template slot has no value
    /// - `GeneratorError::Format` naming the first file the formatter rejects
    pub fn generate(&self) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let mut files = Vec::with_capacity(self.collection.len() + 1);
        let mut entries = Vec::with_capacity(self.collection.len());
        let mut owners: BTreeMap<String, &str> = BTreeMap::new();

        for def in self.collection.iter() {
            let ident = self.naming.identifier(&def.name);
            if let Some(other) = owners.insert(ident.clone(), &def.name) {
                return Err(GeneratorError::validation(
                    format!("types.{}", def.name),
                    format!("file name '{ident}.py' is already used by type '{other}'"),
                ));
            }

            let file_name = format!("{ident}.py");
            let source = render_type_module(def, &self.templates.types, &self.options)?;
            let contents = self.format(&file_name, &source)?;
            debug!(type_name = %def.name, file = %file_name, "Rendered type module");

            files.push(GeneratedFile { file_name, contents });
            entries.push((ident, def.name.clone()));
        }

        let index = render_index(&entries, &self.templates.index)?;
        let contents = self.format(INDEX_FILE, &index)?;
        files.push(GeneratedFile {
            file_name: INDEX_FILE.to_string(),
            contents,
        });

        Ok(files)
    }

    fn format(&self, file_name: &str, source: &str) -> Result<String, GeneratorError> {
        self.formatter
            .format(source, self.options.line_width)
            .map_err(|e| GeneratorError::Format {
                file: file_name.to_string(),
                source: e,
            })
    }
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::Write` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::Write {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::Write {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Writes every file into `output_dir`, creating it if necessary.
pub fn write_files(output_dir: &Path, files: &[GeneratedFile]) -> Result<(), GeneratorError> {
    fs::create_dir_all(output_dir).map_err(|e| GeneratorError::Write {
        path: output_dir.display().to_string(),
        source: e,
    })?;

    for file in files {
        let path = output_dir.join(&file.file_name);
        write_atomic(&path, &file.contents)?;
        info!(path = %path.display(), "Wrote generated file");
    }
    Ok(())
}

/// Runs the full pipeline described by `config`.
///
/// Loads and validates the schema, loads both templates, renders and
/// formats every file, then writes them unless `dry_run` is set. The
/// generated files are returned either way.
///
/// ## Errors
///
/// Any [`GeneratorError`]; on error nothing has been written.
pub fn generate_and_write(
    config: &GeneratorConfig,
    formatter: &dyn SourceFormatter,
    dry_run: bool,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    config.validate()?;

    let collection = load_schema(&config.schema_path, config.strict_references)?;
    if collection.is_empty() {
        warn!(schema = %config.schema_path.display(), "Schema declares no types");
    }
    info!(
        schema = %config.schema_path.display(),
        types = collection.len(),
        "Loaded schema"
    );

    let templates = Templates::load(&config.template_dir)?;

    let files = Generator::new(&collection, &templates, formatter)
        .with_options(config.render.clone())
        .with_naming(NamingExceptions::new(config.naming_exceptions.clone()))
        .generate()?;

    if dry_run {
        info!(files = files.len(), "Dry run, nothing written");
    } else {
        write_files(&config.output_dir, &files)?;
        info!(
            files = files.len(),
            output = %config.output_dir.display(),
            "Generation complete"
        );
    }

    Ok(files)
}
