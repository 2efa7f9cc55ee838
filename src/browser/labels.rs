//! Label templates: how each node kind is captioned in the tree.
//!
//! Templates are keyed by a kind's fully-qualified name. `${property}` is
//! replaced by the node's property of that name (`null` when the property is
//! missing or not computed yet) and `$$` is a literal `$`.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use once_cell::sync::OnceCell;
use phf::phf_map;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{common::PropertyValue, error::Error};

static DEFAULT_TEMPLATES: phf::Map<&'static str, &'static str> = phf_map! {
    "scriptview.ast.ClassNode" => "ClassNode - ${name}",
    "scriptview.ast.ConstructorNode" => "ConstructorNode - ${name}(${parameters})",
    "scriptview.ast.MethodNode" => "MethodNode - ${name}",
    "scriptview.ast.FieldNode" => "FieldNode - ${name} : ${type}",
    "scriptview.ast.PropertyNode" => "PropertyNode - ${name} : ${type}",
    "scriptview.ast.AnnotationNode" => "AnnotationNode - ${class_name}",
    "scriptview.ast.stmt.BlockStatement" => "BlockStatement - (${statement_count})",
    "scriptview.ast.stmt.ExpressionStatement" => "ExpressionStatement - ${expression_kind}",
    "scriptview.ast.stmt.ReturnStatement" => "ReturnStatement - ${text}",
    "scriptview.ast.stmt.ForStatement" => "ForStatement - ${variable}",
    "scriptview.ast.stmt.CatchStatement" => "CatchStatement - ${variable}",
    "scriptview.ast.expr.MethodCallExpression" => "MethodCall - ${text}",
    "scriptview.ast.expr.StaticMethodCallExpression" => "MethodCall - ${text}",
    "scriptview.ast.expr.ConstructorCallExpression" => "ConstructorCall - ${text}",
    "scriptview.ast.expr.BinaryExpression" => "Binary - ${text}",
    "scriptview.ast.expr.DeclarationExpression" => "Declaration - ${text}",
    "scriptview.ast.expr.TernaryExpression" => "Ternary - ${text}",
    "scriptview.ast.expr.ElvisOperatorExpression" => "ElvisOperator - ${text}",
    "scriptview.ast.expr.PostfixExpression" => "Postfix - ${operation}",
    "scriptview.ast.expr.PrefixExpression" => "Prefix - ${operation}",
    "scriptview.ast.expr.BooleanExpression" => "Boolean - ${text}",
    "scriptview.ast.expr.NotExpression" => "Not - ${text}",
    "scriptview.ast.expr.ClosureExpression" => "ClosureExpression",
    "scriptview.ast.expr.ArgumentListExpression" => "ArgumentList - ${text}",
    "scriptview.ast.expr.ListExpression" => "List - ${text}",
    "scriptview.ast.expr.MapExpression" => "Map - ${text}",
    "scriptview.ast.expr.MapEntryExpression" => "MapEntry - ${text}",
    "scriptview.ast.expr.RangeExpression" => "Range - ${text}",
    "scriptview.ast.expr.MethodPointerExpression" => "MethodPointer - ${text}",
    "scriptview.ast.expr.CastExpression" => "Casting - ${text}",
    "scriptview.ast.expr.ConstantExpression" => "Constant - ${value} : ${constant_type}",
    "scriptview.ast.expr.ClassExpression" => "Class - ${text}",
    "scriptview.ast.expr.VariableExpression" => "Variable - ${name} : ${origin}",
    "scriptview.ast.expr.PropertyExpression" => "Property - ${property}",
    "scriptview.ast.expr.AttributeExpression" => "Attribute - ${property}",
    "scriptview.ast.expr.FieldExpression" => "Field - ${field_name}",
    "scriptview.ast.expr.GStringExpression" => "GString - ${text}",
    "scriptview.ast.expr.BytecodeExpression" => "Bytecode - (${instruction_count})",
};

const OVERRIDE_FILE: &str = "labels.toml";

static GLOBAL: OnceCell<LabelMapping> = OnceCell::new();

/// On-disk form of the override file: a flat table of templates.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct LabelFile {
    templates: HashMap<String, String>,
}

/// Fully-qualified kind name to label template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelMapping {
    templates: HashMap<String, String>,
}

impl LabelMapping {
    /// The templates bundled with the binary.
    pub fn defaults() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .entries()
                .map(|(kind, template)| ((*kind).to_owned(), (*template).to_owned()))
                .collect(),
        }
    }

    /// No templates at all: every label is its kind's simple name.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>, T: Into<String>>(&mut self, kind: K, template: T) {
        self.templates.insert(kind.into(), template.into());
    }

    /// The bundled templates overlaid by those of the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let config_error = |reason: String| Error::LabelConfig {
            path: path.to_path_buf(),
            reason,
        };

        let contents = fs::read_to_string(path).map_err(|error| config_error(error.to_string()))?;
        let file: LabelFile =
            toml::from_str(&contents).map_err(|error| config_error(error.to_string()))?;

        let mut mapping = Self::defaults();
        mapping.templates.extend(file.templates);

        debug!(path = %path.display(), "loaded label templates");
        Ok(mapping)
    }

    /// `~/.scriptview/labels.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".scriptview").join(OVERRIDE_FILE))
    }

    /// Process-wide mapping, built on first use from the bundled templates
    /// and the override file in the home directory (when there is one).
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(|| match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path).unwrap_or_else(|error| {
                warn!(%error, "ignoring label override file");
                Self::defaults()
            }),
            _ => Self::defaults(),
        })
    }

    pub fn template(&self, qualified_name: &str) -> Option<&str> {
        self.templates.get(qualified_name).map(String::as_str)
    }
}

/// Fill in the `${...}` placeholders of a template.
pub fn render(template: &str, properties: &[PropertyValue]) -> String {
    let lookup = |name: &str| {
        properties
            .iter()
            .find(|property| property.name == name)
            .and_then(|property| property.value.clone())
            .unwrap_or_else(|| "null".to_owned())
    };

    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('$') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        if let Some(after_dollar) = after.strip_prefix('$') {
            rendered.push('$');
            rest = after_dollar;
        } else if let Some((name, remainder)) = after
            .strip_prefix('{')
            .and_then(|placeholder| placeholder.split_once('}'))
        {
            rendered.push_str(&lookup(name.trim()));
            rest = remainder;
        } else {
            rendered.push('$');
            rest = after;
        }
    }

    rendered.push_str(rest);
    rendered
}
