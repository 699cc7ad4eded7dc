use crate::compiler::{compile_schema, FinalSchemaConfig, SchemaConfig};
use crate::error::{IdeaError, ResolverError};
use crate::lexer::Lexer;
use crate::trees::{SchemaTree, Tree};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::path::{Component, Path, PathBuf};

/// Supplies the source of a schema named by a `use` path.
///
/// The crate never touches the file system; callers decide where sources
/// come from (disk, memory, network...).
pub trait SourceLoader {
    fn load(&mut self, path: &str) -> Option<String>;
}

impl SourceLoader for HashMap<String, String> {
    fn load(&mut self, path: &str) -> Option<String> {
        self.get(path).cloned()
    }
}

impl<F> SourceLoader for F
where
    F: FnMut(&str) -> Option<String>,
{
    fn load(&mut self, path: &str) -> Option<String> {
        self(path)
    }
}

/// Merges `use` imports into the schema that declares them.
///
/// Imported `prop`, `enum`, `type` and `model` entries are added only where
/// the importing schema does not already declare the same name.
pub struct Resolver<L: SourceLoader> {
    loader: L,
    // Paths currently being resolved, used to detect import cycles
    resolving_stack: Vec<String>,
    resolved: HashMap<String, SchemaConfig>,
}

impl<L: SourceLoader> Resolver<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            resolving_stack: Vec::new(),
            resolved: HashMap::new(),
        }
    }

    /// Resolves every import of `schema`, which was read from `path`, and
    /// returns it with the imports merged in and its `use` section removed.
    pub fn resolve(&mut self, schema: SchemaConfig, path: &str) -> Result<SchemaConfig, IdeaError> {
        if self.resolving_stack.iter().any(|entry| entry == path) {
            let mut cycle = self.resolving_stack.clone();
            cycle.push(path.to_string());
            return Err(ResolverError::CircularDependency {
                cycle: cycle.join(" -> "),
            }
            .into());
        }

        self.resolving_stack.push(path.to_string());
        let result = self.merge_imports(schema, path);
        self.resolving_stack.pop();
        result
    }

    /// Resolves imports, then substitutes prop references and drops `prop` and `use`.
    pub fn finalize(&mut self, schema: SchemaConfig, path: &str) -> Result<FinalSchemaConfig, IdeaError> {
        let merged = self.resolve(schema, path)?;
        Ok(merged.finalize()?)
    }

    fn merge_imports(&mut self, mut schema: SchemaConfig, path: &str) -> Result<SchemaConfig, IdeaError> {
        let imports = schema.r#use.take().unwrap_or_default();
        for import in imports {
            let target = join(path, &import);
            let imported = match self.resolved.get(&target) {
                Some(imported) => imported.clone(),
                None => {
                    let imported = self.load(&target)?;
                    self.resolved.insert(target, imported.clone());
                    imported
                }
            };
            merge(&mut schema, imported);
        }
        Ok(schema)
    }

    fn load(&mut self, path: &str) -> Result<SchemaConfig, IdeaError> {
        debug!("Loading imported schema {}", path);
        let code = self
            .loader
            .load(path)
            .ok_or_else(|| ResolverError::ModuleNotFound {
                path: path.to_string(),
            })?;
        let token = SchemaTree::with_lexer(Lexer::new().named(path)).parse(&code, 0)?;
        let schema = compile_schema(&token, false)?;
        self.resolve(schema, path)
    }
}

fn merge(schema: &mut SchemaConfig, imported: SchemaConfig) {
    soft_merge(&mut schema.prop, imported.prop);
    soft_merge(&mut schema.r#enum, imported.r#enum);
    soft_merge(&mut schema.r#type, imported.r#type);
    soft_merge(&mut schema.model, imported.model);
}

fn soft_merge<T>(local: &mut Option<BTreeMap<String, T>>, imported: Option<BTreeMap<String, T>>) {
    let Some(imported) = imported else {
        return;
    };
    let local = local.get_or_insert_with(BTreeMap::new);
    for (name, config) in imported {
        local.entry(name).or_insert(config);
    }
}

/// Resolves `import` against the directory of `from`. Only relative imports
/// (`./x`, `../x`) are joined; anything else is passed to the loader as written.
fn join(from: &str, import: &str) -> String {
    if !(import.starts_with("./") || import.starts_with("../")) {
        return import.to_string();
    }
    let base = Path::new(from).parent().unwrap_or_else(|| Path::new(""));
    let mut normalized = PathBuf::new();
    for component in base.join(import).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized.to_string_lossy().replace('\\', "/")
}
